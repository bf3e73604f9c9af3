//! Newtype IDs for type-safe entity references.
//!
//! The backend issues UUIDs for every entity and the storefront never
//! interprets them, so ids wrap the string form. Use the `define_id!` macro to
//! create wrappers that prevent accidentally mixing ids of different entities.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use yen_flowers_core::define_id;
/// define_id!(OrderId);
/// define_id!(VoucherId);
///
/// let order_id = OrderId::new("8f14e45f");
/// let voucher_id = VoucherId::new("8f14e45f");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = voucher_id;
/// # let _ = (order_id, voucher_id);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CategoryId);
define_id!(SocialPostId);
define_id!(SessionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new("3c9a2f1e-0000-4000-8000-000000000001");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"3c9a2f1e-0000-4000-8000-000000000001\"");
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = CategoryId::from("sinh-nhat");
        assert_eq!(id.to_string(), "sinh-nhat");
        assert_eq!(id.as_str(), "sinh-nhat");
        let raw: String = id.into();
        assert_eq!(raw, "sinh-nhat");
    }
}
