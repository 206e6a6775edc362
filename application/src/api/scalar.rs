//! Helpers for defining GraphQL scalars over validated domain values.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Adapter for `#[graphql(with = ..)]` attribute, representing a scalar as a
/// GraphQL string in the textual form of the wrapped domain value `As`.
///
/// The scalar type must implement [`AsRef`] and [`TryFrom`] for `As`, while
/// `As` itself is parsed with [`FromStr`] and printed with [`Display`].
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Prints the provided scalar as a GraphQL string.
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::scalar(value.as_ref().to_string())
    }

    /// Parses the scalar from the provided GraphQL [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the [`InputValue`] is not a string, or the string is not a valid
    /// `As` value, or the `As` value is not accepted by the scalar.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let invalid = |reason: &dyn fmt::Display| {
            format!("Invalid `{}` scalar: {reason}", scalar_name::<T, S>())
        };

        let s = input.as_string_value().ok_or_else(|| {
            invalid(&format_args!("expected a string, found `{input}`"))
        })?;
        let value = s
            .parse::<As>()
            .map_err(|e| invalid(&format_args!("\"{s}\": {e}")))?;
        T::try_from(value).map_err(|e| invalid(&e))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the [`ScalarToken`] is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Returns the GraphQL name of the `T` scalar.
fn scalar_name<T, S>() -> String
where
    T: GraphQLType<S, TypeInfo = ()>,
    S: ScalarValue,
{
    T::name(&()).map_or_else(|| "<unnamed>".to_owned(), |n| n.to_string())
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain;

    use crate::api::facility;

    use super::Via;

    type SlugVia = Via<domain::Slug>;

    #[test]
    fn round_trips_through_string() {
        let input = InputValue::<DefaultScalarValue>::scalar("gor-bulutangkis");

        let slug: facility::Slug = SlugVia::from_input(&input).unwrap();

        assert_eq!(slug.to_string(), "gor-bulutangkis");
        assert_eq!(
            SlugVia::to_output::<_, DefaultScalarValue>(&slug),
            Value::scalar("gor-bulutangkis".to_owned()),
        );
    }

    #[test]
    fn names_scalar_in_errors() {
        let err = SlugVia::from_input::<facility::Slug, _>(
            &InputValue::<DefaultScalarValue>::scalar("Not A Slug"),
        )
        .unwrap_err();
        assert!(err.starts_with("Invalid `Slug` scalar"), "{err}");

        let err = SlugVia::from_input::<facility::Slug, _>(
            &InputValue::<DefaultScalarValue>::scalar(42),
        )
        .unwrap_err();
        assert!(err.contains("expected a string"), "{err}");
    }
}
