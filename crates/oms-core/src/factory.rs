//! Order factory: validation, pricing, and identity generation.
//!
//! The factory is pure. It turns a raw request into a fully priced
//! `Order` without touching storage; persisting the result is the
//! engine's job. Validation reports the first violated rule only.

use chrono::{DateTime, Utc};
use oms_types::{NewOrderRequest, Order, OrderItem, OrderStatus, PickupType};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::EngineError;

/// Literal prefix of every generated order id.
pub const ORDER_ID_PREFIX: &str = "order";

/// Number of random hex characters appended to generated order ids.
const ORDER_ID_SUFFIX_LEN: usize = 12;

/// Price breakdown of an order at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPricing {
	/// Sum of unit price times quantity over retained items.
	pub subtotal: Decimal,
	/// Dine-in surcharge; zero for take-out orders.
	pub service_charge: Decimal,
	/// Subtotal plus service charge plus extra charges.
	pub total_price: Decimal,
}

/// Validates a raw request and produces a fully priced order.
///
/// The returned order is `Active` with `created_at` set to now and no
/// completion timestamp. Line items with a non-positive quantity are
/// discarded before any other item rule is checked.
pub fn build_order(
	request: &NewOrderRequest,
	service_charge_rate: Decimal,
) -> Result<Order, EngineError> {
	let customer_first_name = request.customer_first_name.trim();
	if customer_first_name.is_empty() {
		return Err(EngineError::Validation(
			"customer first name is required".into(),
		));
	}

	let customer_last_name = request.customer_last_name.trim();
	if customer_last_name.is_empty() {
		return Err(EngineError::Validation(
			"customer last name is required".into(),
		));
	}

	let pickup_type: PickupType = request.pickup_type.parse().map_err(|_| {
		EngineError::Validation(format!(
			"unrecognized pickup type: '{}'",
			request.pickup_type
		))
	})?;

	let items: Vec<OrderItem> = request
		.items
		.iter()
		.filter(|item| item.quantity > 0)
		.map(|item| OrderItem {
			name: item.name.clone(),
			unit_price: item.unit_price,
			quantity: item.quantity,
		})
		.collect();
	if items.is_empty() {
		return Err(EngineError::Validation(
			"at least one item with a positive quantity is required".into(),
		));
	}
	if let Some(item) = items.iter().find(|item| item.unit_price < Decimal::ZERO) {
		return Err(EngineError::Validation(format!(
			"item '{}' has a negative unit price",
			item.name
		)));
	}

	let extra_charges = parse_extra_charges(request.extra_charges.as_ref())?;
	let pricing = price_order(&items, pickup_type, extra_charges, service_charge_rate);

	let created_at = Utc::now();
	Ok(Order {
		id: generate_order_id(created_at),
		customer_first_name: customer_first_name.to_string(),
		customer_last_name: customer_last_name.to_string(),
		pickup_type,
		items,
		extra_charges,
		notes: request.notes.clone().unwrap_or_default(),
		total_price: pricing.total_price,
		status: OrderStatus::Active,
		created_at,
		completed_at: None,
	})
}

/// Computes the price breakdown for a set of retained items.
///
/// All arithmetic is exact decimal arithmetic; nothing is rounded here.
/// Rounding to two decimal places happens only at presentation
/// boundaries.
pub fn price_order(
	items: &[OrderItem],
	pickup_type: PickupType,
	extra_charges: Decimal,
	service_charge_rate: Decimal,
) -> OrderPricing {
	let subtotal: Decimal = items
		.iter()
		.map(|item| item.unit_price * Decimal::from(item.quantity))
		.sum();

	let service_charge = match pickup_type {
		PickupType::DineIn => subtotal * service_charge_rate,
		PickupType::TakeOut => Decimal::ZERO,
	};

	OrderPricing {
		subtotal,
		service_charge,
		total_price: subtotal + service_charge + extra_charges,
	}
}

/// Interprets the extra charges field of a raw request.
///
/// Absent values and values that do not parse to a number fall back to
/// zero without an error; a value that does parse must be non-negative.
fn parse_extra_charges(value: Option<&serde_json::Value>) -> Result<Decimal, EngineError> {
	let parsed = match value {
		None => None,
		Some(serde_json::Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
		Some(serde_json::Value::String(s)) => s.trim().parse::<Decimal>().ok(),
		Some(_) => None,
	};

	match parsed {
		Some(amount) if amount < Decimal::ZERO => Err(EngineError::Validation(
			"extra charges must not be negative".into(),
		)),
		Some(amount) => Ok(amount),
		None => Ok(Decimal::ZERO),
	}
}

/// Builds an order id from the fixed prefix, the creation timestamp in
/// milliseconds, and a random suffix drawn from a v4 UUID.
///
/// Uniqueness is best-effort: two orders created within the same
/// millisecond collide only if their random suffixes also match, which
/// is improbable at expected order volumes but not guaranteed.
pub fn generate_order_id(created_at: DateTime<Utc>) -> String {
	let entropy = Uuid::new_v4().simple().to_string();
	format!(
		"{}_{}_{}",
		ORDER_ID_PREFIX,
		created_at.timestamp_millis(),
		&entropy[..ORDER_ID_SUFFIX_LEN]
	)
}
