//! HTTP endpoint for uploading `Facility` photos.
//!
//! Files are sent as `multipart/form-data`, each part being a separate photo.
//! Every file is attached independently, so a failed one doesn't prevent the
//! others from being attached.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path},
    Extension, Json,
};
use serde::Serialize;
use service::{command, domain::media, Command as _};
use tracing as log;
use uuid::Uuid;

use crate::{define_error, AsError, Error, Service};

/// Result of uploading a single file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    /// Name of the uploaded file, as sent by the client.
    pub file_name: String,

    /// Attached photo, if succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,

    /// Reason of the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

/// Photo attached from an uploaded file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// ID of the attached photo.
    pub id: Uuid,

    /// Sanitized name under which the file is stored.
    pub file_name: String,

    /// Display position of the attached photo.
    pub order: u16,
}

impl From<service::domain::Media> for Photo {
    fn from(media: service::domain::Media) -> Self {
        Self {
            id: media.id.into(),
            file_name: media.file_name.to_string(),
            order: media.order,
        }
    }
}

/// Failure of uploading a single file.
#[derive(Clone, Debug, Serialize)]
pub struct Failure {
    /// [`Error`] code.
    pub code: &'static str,

    /// Human-readable [`Error`] message.
    pub message: String,
}

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Self {
            code: e.code,
            message: e.message,
        }
    }
}

/// Attaches every uploaded file to the `Facility` as a photo.
///
/// # Errors
///
/// If the request body is not a valid `multipart/form-data`.
#[tracing::instrument(
    skip_all,
    fields(facility_id = %facility_id),
)]
pub async fn facility_photos(
    Extension(service): Extension<Service>,
    Path(facility_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Uploaded>>, MultipartError> {
    let mut uploaded = vec![];

    while let Some(field) = multipart.next_field().await? {
        let raw_name = field.file_name().unwrap_or_default().to_owned();
        let parsed = parse_part(&raw_name, field.content_type());
        let content = field.bytes().await?;

        let result = match parsed {
            Ok((file_name, mime_type)) => service
                .execute(command::AttachFacilityPhoto {
                    facility_id: facility_id.into(),
                    file_name,
                    mime_type,
                    content: content.into(),
                })
                .await
                .map(Photo::from)
                .map_err(AsError::into_error),
            Err(e) => Err(e),
        };

        uploaded.push(match result {
            Ok(photo) => Uploaded {
                file_name: raw_name,
                photo: Some(photo),
                error: None,
            },
            Err(e) => {
                log::warn!("failed to attach `{raw_name}`: {e}");
                Uploaded {
                    file_name: raw_name,
                    photo: None,
                    error: Some(e.into()),
                }
            }
        });
    }

    Ok(Json(uploaded))
}

/// Parses the [`media::FileName`] and the [`media::MimeType`] of a multipart
/// part.
fn parse_part(
    file_name: &str,
    content_type: Option<&str>,
) -> Result<(media::FileName, media::MimeType), Error> {
    define_error! {
        enum PartError {
            #[code = "INVALID_FILE_NAME"]
            #[status = BAD_REQUEST]
            #[message = "File name is missing or contains nothing usable"]
            FileName,

            #[code = "UNSUPPORTED_MEDIA_TYPE"]
            #[status = UNSUPPORTED_MEDIA_TYPE]
            #[message = "Only image files can be attached as photos"]
            MimeType,
        }
    }

    let file_name =
        media::FileName::sanitize(file_name).ok_or(PartError::FileName)?;
    let mime_type = content_type
        .and_then(media::MimeType::new)
        .ok_or(PartError::MimeType)?;
    Ok((file_name, mime_type))
}

#[cfg(test)]
mod spec {
    use serde_json::json;
    use uuid::Uuid;

    use crate::Error;

    use super::{parse_part, Failure, Photo, Uploaded};

    #[test]
    fn sanitizes_file_name() {
        let (name, mime) =
            parse_part("C:\\photos\\lapangan utama.JPG", Some("image/jpeg"))
                .unwrap();

        assert_eq!(name.to_string(), "lapangan-utama.JPG");
        assert_eq!(mime.to_string(), "image/jpeg");
    }

    #[test]
    fn rejects_unusable_parts() {
        let err = parse_part("", Some("image/png")).unwrap_err();
        assert_eq!(err.code, "INVALID_FILE_NAME");

        let err = parse_part("gor.png", None).unwrap_err();
        assert_eq!(err.code, "UNSUPPORTED_MEDIA_TYPE");
        assert_eq!(err.status_code, http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn serializes_results() {
        let id = Uuid::new_v4();
        let results = vec![
            Uploaded {
                file_name: "a.png".into(),
                photo: Some(Photo {
                    id,
                    file_name: "a.png".into(),
                    order: 0,
                }),
                error: None,
            },
            Uploaded {
                file_name: "b.txt".into(),
                photo: None,
                error: Some(Failure::from(Error::internal(&"boom"))),
            },
        ];

        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!([
                {
                    "fileName": "a.png",
                    "photo": {
                        "id": id.to_string(),
                        "fileName": "a.png",
                        "order": 0,
                    },
                },
                {
                    "fileName": "b.txt",
                    "error": {
                        "code": "INTERNAL_SERVER_ERROR",
                        "message": "boom",
                    },
                },
            ]),
        );
    }
}
