//! Order types for the order management system.
//!
//! This module defines the persisted `Order` entity, its line items, and
//! the raw request payload that the order factory validates and prices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A priced restaurant order.
///
/// Orders are created exactly once by the order factory and are immutable
/// afterwards except for the transition to `Completed`. The total price is
/// computed at creation and stored; it is never recomputed, even if
/// pricing rules change later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order, generated at creation.
	pub id: String,
	/// Customer first name.
	pub customer_first_name: String,
	/// Customer last name.
	pub customer_last_name: String,
	/// How the customer receives the order.
	pub pickup_type: PickupType,
	/// Line items; never contains a zero or negative quantity entry.
	pub items: Vec<OrderItem>,
	/// Charges applied on top of the subtotal, never negative.
	pub extra_charges: Decimal,
	/// Free-form notes attached to the order.
	#[serde(default)]
	pub notes: String,
	/// Subtotal plus service charge plus extra charges, stored unrounded.
	/// Rounding to two decimal places is a presentation concern.
	pub total_price: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this order was completed.
	/// Present if and only if the status is `Completed`.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub completed_at: Option<DateTime<Utc>>,
}

/// A single line item on a persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Menu item name.
	pub name: String,
	/// Price per unit. The wire field is `price` for compatibility with
	/// existing clients.
	#[serde(rename = "price")]
	pub unit_price: Decimal,
	/// Number of units ordered; always positive once persisted.
	pub quantity: i64,
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupType {
	/// Order is served at a table; a service charge applies.
	#[serde(rename = "Dine-In")]
	DineIn,
	/// Order is picked up at the counter.
	#[serde(rename = "Take-Out")]
	TakeOut,
}

impl PickupType {
	/// Returns the wire representation of the pickup type.
	pub fn as_str(&self) -> &'static str {
		match self {
			PickupType::DineIn => "Dine-In",
			PickupType::TakeOut => "Take-Out",
		}
	}
}

impl FromStr for PickupType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Dine-In" => Ok(Self::DineIn),
			"Take-Out" => Ok(Self::TakeOut),
			_ => Err(()),
		}
	}
}

impl fmt::Display for PickupType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Status of an order in the system.
///
/// Orders move from `Active` to `Completed` exactly once; there is no
/// cancellation and no re-opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
	/// Order has been placed and not yet handed to the customer.
	#[serde(rename = "ACTIVE")]
	Active,
	/// Order has been handed to the customer.
	#[serde(rename = "COMPLETED")]
	Completed,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Active => write!(f, "ACTIVE"),
			OrderStatus::Completed => write!(f, "COMPLETED"),
		}
	}
}

/// Raw order payload as submitted by a client, before validation.
///
/// Deliberately loose: the order factory is the single place where names,
/// pickup types, quantities, and extra charges are checked and normalized,
/// so missing or malformed fields surface as validation errors rather than
/// deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
	/// Customer first name as submitted.
	#[serde(default)]
	pub customer_first_name: String,
	/// Customer last name as submitted.
	#[serde(default)]
	pub customer_last_name: String,
	/// Pickup type as submitted; parsed by the factory.
	#[serde(default)]
	pub pickup_type: String,
	/// Requested line items, including any zero-quantity rows the factory
	/// will discard.
	#[serde(default)]
	pub items: Vec<RawOrderItem>,
	/// Extra charges as submitted: a number, a numeric string, or absent.
	#[serde(default)]
	pub extra_charges: Option<serde_json::Value>,
	/// Optional order notes.
	#[serde(default)]
	pub notes: Option<String>,
}

/// A line item as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrderItem {
	/// Menu item name.
	pub name: String,
	/// Price per unit as submitted.
	#[serde(rename = "price")]
	pub unit_price: Decimal,
	/// Requested quantity; entries with `quantity <= 0` are discarded.
	#[serde(default)]
	pub quantity: i64,
}
