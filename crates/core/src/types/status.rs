//! String-backed status enums for domain entities.
//!
//! All of these are stored as TEXT columns (with CHECK constraints in the
//! schema) and exposed over the API with their canonical string form, so the
//! enum/string mapping lives in one place here.

/// Macro to define a string-backed enum.
///
/// Creates an enum with:
/// - `as_str()` returning the canonical wire/database form
/// - `Display` and `FromStr` (rejecting unknown strings)
/// - `Serialize`/`Deserialize` through the canonical form
/// - `sqlx` `Type`, `Encode`, and `Decode` as TEXT (with `postgres` feature)
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// The canonical string form, as stored and served.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                s.parse().map_err(Into::into)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

define_str_enum! {
    /// Physical condition grades for collectible products.
    ///
    /// "Excelent" keeps the spelling existing data was recorded with.
    ProductCondition {
        Mint => "Mint",
        NearMint => "Near Mint",
        Excelent => "Excelent",
        Good => "Good",
        LightlyPlayed => "Lightly Played",
        Played => "Played",
        Poor => "Poor",
    }
}

define_str_enum! {
    /// Lifecycle of a physical product unit.
    InstanceStatus {
        Available => "available",
        Reserved => "reserved",
        Sold => "sold",
    }
}

define_str_enum! {
    /// Where a product unit is held.
    StockLocation {
        Colombia => "Colombia",
        Usa => "USA",
    }
}

define_str_enum! {
    /// How a sale was paid.
    PaymentMethod {
        Credit => "Credit",
        Cash => "Cash",
        Usd => "USD",
        Trade => "Trade",
    }
}

define_str_enum! {
    /// Inventory movement kinds recorded in the audit trail.
    TransactionType {
        Restock => "restock",
        Sale => "sale",
        Adjustment => "adjustment",
        Return => "return",
        Reserve => "reserve",
        Release => "release",
    }
}

define_str_enum! {
    /// Supplier relationship tier.
    DebtorType {
        Regular => "regular",
        Preferred => "preferred",
        Premium => "premium",
    }
}

define_str_enum! {
    /// Order lifecycle status.
    OrderStatus {
        Pending => "pending",
        Paid => "paid",
        Shipped => "shipped",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl OrderStatus {
    /// Terminal statuses cannot transition any further.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_roundtrip() {
        for text in [
            "Mint",
            "Near Mint",
            "Excelent",
            "Good",
            "Lightly Played",
            "Played",
            "Poor",
        ] {
            let parsed: ProductCondition = text.parse().unwrap();
            assert_eq!(parsed.as_str(), text);
        }
    }

    #[test]
    fn test_condition_rejects_unknown() {
        assert!("Damaged".parse::<ProductCondition>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let json = serde_json::to_string(&ProductCondition::NearMint).unwrap();
        assert_eq!(json, "\"Near Mint\"");
        let parsed: ProductCondition = serde_json::from_str("\"Near Mint\"").unwrap();
        assert_eq!(parsed, ProductCondition::NearMint);
    }

    #[test]
    fn test_transaction_type_lowercase() {
        assert_eq!(TransactionType::Restock.as_str(), "restock");
        assert_eq!(
            "release".parse::<TransactionType>().unwrap(),
            TransactionType::Release
        );
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_payment_method_usd_is_uppercase() {
        assert_eq!(PaymentMethod::Usd.as_str(), "USD");
    }
}
