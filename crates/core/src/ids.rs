use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }

            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(ItemId);
uuid_id!(TemplateId);

const ACCESS_KEY_LEN: usize = 16;

/// The `(trip_id, access_key)` pair is the entire authorization boundary:
/// anyone holding both values has full read/write on the trip's items.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripKey {
    pub trip_id: String,
    pub access_key: String,
}

impl TripKey {
    pub fn new(trip_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            access_key: access_key.into(),
        }
    }

    /// Mint a fresh shareable key pair for a new trip link.
    pub fn generate() -> Self {
        let access_key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ACCESS_KEY_LEN)
            .map(char::from)
            .collect();
        Self {
            trip_id: Uuid::now_v7().to_string(),
            access_key,
        }
    }

    /// Fixed-width digest identifying this trip in the local cache without
    /// storing the access key in plaintext.
    pub fn cache_digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.trip_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.access_key.as_bytes());
        *hasher.finalize().as_bytes()
    }
}

impl fmt::Debug for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the shared secret.
        write!(f, "TripKey({}, ****)", self.trip_id)
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trip_id)
    }
}
