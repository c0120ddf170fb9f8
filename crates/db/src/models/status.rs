//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based) in
//! the corresponding `*_statuses` database table, and each carries the
//! canonical uppercase wire name other layers must preserve.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Canonical uppercase name, as serialized in API responses.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            /// Resolve a database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                $(
                    if id == $val {
                        return Some(Self::$variant);
                    }
                )+
                None
            }

            /// Parse a canonical wire name (e.g. from a request body).
            pub fn from_name(name: &str) -> Option<Self> {
                $(
                    if name == $wire {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Vehicle availability status. RENTED/AVAILABLE is a cached projection
    /// of the active bookings; MAINTENANCE/OUT_OF_SERVICE are manual owner
    /// suspensions.
    VehicleStatus {
        Available = 1 => "AVAILABLE",
        Rented = 2 => "RENTED",
        Maintenance = 3 => "MAINTENANCE",
        OutOfService = 4 => "OUT_OF_SERVICE",
    }
}

define_status_enum! {
    /// Booking lifecycle status.
    BookingStatus {
        Pending = 1 => "PENDING",
        Confirmed = 2 => "CONFIRMED",
        Active = 3 => "ACTIVE",
        Completed = 4 => "COMPLETED",
        Cancelled = 5 => "CANCELLED",
    }
}
