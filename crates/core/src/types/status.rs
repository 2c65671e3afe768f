//! Status enums for marketplace entities.
//!
//! Each enum mirrors a `PostgreSQL` enum type in the `app` schema. With the
//! `postgres` feature they decode straight from query rows.

use serde::{Deserialize, Serialize};

/// Role of a marketplace profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.profile_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    /// Buys gifts against registries.
    Guest,
    /// Owns one or more registries.
    Host,
    /// Sells products and receives payouts.
    Vendor,
    /// Moderates the marketplace.
    Admin,
}

impl ProfileRole {
    /// All roles, in display order.
    pub const ALL: [Self; 4] = [Self::Guest, Self::Host, Self::Vendor, Self::Admin];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Host => "host",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("invalid profile role: {s}"))
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Whether the order counts towards sales, commission and payouts.
    #[must_use]
    pub const fn is_revenue_bearing(self) -> bool {
        matches!(self, Self::Paid | Self::Shipped | Self::Delivered)
    }
}

/// Vendor payout status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.payout_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
}

impl PayoutStatus {
    /// Whether the money has left (or is leaving) the platform.
    #[must_use]
    pub const fn is_disbursed(self) -> bool {
        matches!(self, Self::Processing | Self::Paid)
    }
}

/// Support ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.ticket_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_role_roundtrip() {
        for role in ProfileRole::ALL {
            assert_eq!(role.to_string().parse::<ProfileRole>().unwrap(), role);
        }
        assert!("superuser".parse::<ProfileRole>().is_err());
    }

    #[test]
    fn test_revenue_bearing_statuses() {
        assert!(!OrderStatus::Pending.is_revenue_bearing());
        assert!(OrderStatus::Paid.is_revenue_bearing());
        assert!(OrderStatus::Shipped.is_revenue_bearing());
        assert!(OrderStatus::Delivered.is_revenue_bearing());
        assert!(!OrderStatus::Cancelled.is_revenue_bearing());
        assert!(!OrderStatus::Refunded.is_revenue_bearing());
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<PayoutStatus>("\"processing\"").unwrap(),
            PayoutStatus::Processing
        );
    }
}
