//! Status enums for store entities.

use serde::{Deserialize, Serialize};

/// WordPress post status of a product.
///
/// Maps to the REST API `status` field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Pending,
    Private,
    Publish,
    Future,
    Trash,
}

impl PostStatus {
    /// Interpret the text of the admin editor's status box
    /// (`#post-status-display`), e.g. `"Published"` or `"Draft"`.
    ///
    /// Returns `None` for text the editor does not render.
    #[must_use]
    pub fn from_editor_label(label: &str) -> Option<Self> {
        let label = label.trim();
        // "Privately Published" must be checked before "Published".
        if label.contains("Privately") {
            Some(Self::Private)
        } else if label.contains("Published") {
            Some(Self::Publish)
        } else if label.contains("Draft") {
            Some(Self::Draft)
        } else if label.contains("Pending") {
            Some(Self::Pending)
        } else if label.contains("Scheduled") {
            Some(Self::Future)
        } else {
            None
        }
    }

    /// Label the admin editor shows for this status.
    #[must_use]
    pub const fn editor_label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending Review",
            Self::Private => "Privately Published",
            Self::Publish => "Published",
            Self::Future => "Scheduled",
            Self::Trash => "Trash",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Pending => write!(f, "pending"),
            Self::Private => write!(f, "private"),
            Self::Publish => write!(f, "publish"),
            Self::Future => write!(f, "future"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// Shipping method types that can be attached to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethodKind {
    /// Fixed fee regardless of cart contents.
    FlatRate,
    FreeShipping,
    LocalPickup,
}

impl ShippingMethodKind {
    /// The `method_id` the REST API expects.
    #[must_use]
    pub const fn method_id(self) -> &'static str {
        match self {
            Self::FlatRate => "flat_rate",
            Self::FreeShipping => "free_shipping",
            Self::LocalPickup => "local_pickup",
        }
    }
}

impl std::fmt::Display for ShippingMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_id())
    }
}

impl std::str::FromStr for ShippingMethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat_rate" => Ok(Self::FlatRate),
            "free_shipping" => Ok(Self::FreeShipping),
            "local_pickup" => Ok(Self::LocalPickup),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}
