//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data in the
//! corresponding `*_statuses` / `*_kinds` table. Variants serialize as
//! their snake_case key so API payloads and override-cache files carry
//! readable names rather than raw ids.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident = $val:literal => ($key:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( #[serde(rename = $key)] $variant = $val ),+
        }

        impl $name {
            /// Every variant in seed-data order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Stable snake_case key used in JSON and query strings.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or_else(|| {
                    CoreError::Internal(format!(
                        "Unknown {} id {id}",
                        stringify!($name)
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $key => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        stringify!($name),
                        [$( $key ),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_status_enum! {
    /// Order fulfilment status.
    OrderStatus {
        Pending = 1 => ("pending", "Pending"),
        Scheduled = 2 => ("scheduled", "Scheduled"),
        Shooting = 3 => ("shooting", "Shoot in Progress"),
        Editing = 4 => ("editing", "Editing"),
        Delivered = 5 => ("delivered", "Delivered"),
        Completed = 6 => ("completed", "Completed"),
        Cancelled = 7 => ("cancelled", "Cancelled"),
    }
}

define_status_enum! {
    /// Payment state of an order.
    PaymentStatus {
        Unpaid = 1 => ("unpaid", "Unpaid"),
        Processing = 2 => ("processing", "Processing"),
        Paid = 3 => ("paid", "Paid"),
        Failed = 4 => ("failed", "Failed"),
        Refunded = 5 => ("refunded", "Refunded"),
    }
}

define_status_enum! {
    /// Listing status of a property.
    PropertyStatus {
        ComingSoon = 1 => ("coming_soon", "Coming Soon"),
        Active = 2 => ("active", "Active"),
        Pending = 3 => ("pending", "Pending"),
        Sold = 4 => ("sold", "Sold"),
        OffMarket = 5 => ("off_market", "Off Market"),
    }
}

define_status_enum! {
    /// Kind of finished media attached to an order.
    AssetKind {
        Photo = 1 => ("photo", "Photos"),
        Video = 2 => ("video", "Video"),
        Drone = 3 => ("drone", "Drone"),
        Tour = 4 => ("tour", "Virtual Tour"),
        FloorPlan = 5 => ("floor_plan", "Floor Plan"),
    }
}

define_status_enum! {
    /// Outcome of a single payment attempt.
    PaymentAttemptStatus {
        Succeeded = 1 => ("succeeded", "Succeeded"),
        RequiresAction = 2 => ("requires_action", "Requires Action"),
        Processing = 3 => ("processing", "Processing"),
        Failed = 4 => ("failed", "Failed"),
    }
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Orders that still need work from the studio.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Delivered | Self::Completed | Self::Cancelled)
    }

    /// Agents may cancel only before the shoot starts.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled)
    }

    /// Colour key for status badges.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Pending => "gray",
            Self::Scheduled => "blue",
            Self::Shooting => "purple",
            Self::Editing => "amber",
            Self::Delivered => "green",
            Self::Completed => "emerald",
            Self::Cancelled => "red",
        }
    }
}

impl PaymentAttemptStatus {
    /// Order payment status implied by this attempt outcome.
    pub fn order_payment_status(self) -> PaymentStatus {
        match self {
            Self::Succeeded => PaymentStatus::Paid,
            Self::RequiresAction | Self::Processing => PaymentStatus::Processing,
            Self::Failed => PaymentStatus::Failed,
        }
    }
}
