//! Macros for defining kind enums.

/// Macro for defining a kind enum, which variants are represented by string
/// values (in [`Display`], [`FromStr`], [`serde`] and SQL).
///
/// # Example
///
/// ```rust,ignore
/// use common::define_kind;
///
/// define_kind! {
///     #[doc = "Length unit."]
///     enum Length {
///         #[doc = "Meter."]
///         #[value = "m"]
///         Meter,
///
///         #[doc = "Foot."]
///         #[value = "ft"]
///         Foot,
///     }
/// }
/// ```
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
/// [`serde`]: https://docs.rs/serde
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                #[value = $value:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(
                $crate::private::serde::Deserialize,
                $crate::private::serde::Serialize,
            ),
        )]
        #[doc = $doc]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[strum(serialize = $value)]
                #[cfg_attr(feature = "serde", serde(rename = $value))]
                $variant,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the string value representing this variant.
            #[must_use]
            pub const fn value(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $value,
                    )*
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                match <&str as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)?
                {
                    $(
                        $value => Ok(Self::$variant),
                    )*
                    v => Err(::std::format!(
                        "invalid `{}` value: {v}",
                        ::core::stringify!($name),
                    ).into()),
                }
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <&str as $crate::private::postgres_types::FromSql>::accepts(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                <&str as $crate::private::postgres_types::ToSql>::to_sql(
                    &self.value(),
                    ty,
                    w,
                )
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <&str as $crate::private::postgres_types::ToSql>::accepts(ty)
            }
        }
    };
}
