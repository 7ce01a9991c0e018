//! Inventory domain models and stock-movement arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradepost_core::{InventoryId, ProductId, TransactionId, TransactionType};

/// Stock levels for a product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    /// Unique inventory row ID.
    pub inventory_id: InventoryId,
    /// Product this row tracks (one row per product).
    pub product_id: ProductId,
    /// Total on-hand quantity.
    pub quantity: i32,
    /// Quantity free to sell.
    pub available_quantity: i32,
    /// Quantity held back for pending orders.
    pub reserved_quantity: i32,
    /// Restock is suggested when available drops to this level.
    pub reorder_point: i32,
    /// When stock last arrived.
    pub last_restock_date: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for directly setting inventory levels.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInventoryInput {
    pub quantity: Option<i32>,
    pub reorder_point: Option<i32>,
}

/// A recorded inventory movement.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InventoryTransaction {
    pub transaction_id: TransactionId,
    pub inventory_id: InventoryId,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    /// External reference (order number, sale id, ...).
    pub reference_id: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: String,
}

/// Input for recording an inventory movement.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTransactionInput {
    pub inventory_id: InventoryId,
    pub transaction_type: TransactionType,
    /// Movement size. Must be positive except for `adjustment`, which takes
    /// a signed delta.
    pub quantity: i32,
    pub reference_id: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

// =============================================================================
// Movement arithmetic
// =============================================================================

/// The three counters a movement can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevels {
    pub quantity: i32,
    pub available: i32,
    pub reserved: i32,
}

/// Why a movement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error("{transaction_type} quantity must be positive")]
    NonPositiveQuantity { transaction_type: TransactionType },
    #[error("adjustment quantity must not be zero")]
    ZeroAdjustment,
    #[error("movement would drive stock negative")]
    InsufficientStock,
}

/// Apply a movement to a set of stock levels.
///
/// Directional movements (`restock`, `sale`, `return`, `reserve`, `release`)
/// take a positive quantity; `adjustment` takes a signed, non-zero delta.
/// Any result that would drive a counter negative is rejected, leaving the
/// caller's row untouched.
///
/// # Errors
///
/// Returns [`MovementError`] when the quantity has the wrong sign for the
/// movement or the movement would drive a counter below zero.
pub fn apply_movement(
    levels: StockLevels,
    transaction_type: TransactionType,
    quantity: i32,
) -> Result<StockLevels, MovementError> {
    match transaction_type {
        TransactionType::Adjustment => {
            if quantity == 0 {
                return Err(MovementError::ZeroAdjustment);
            }
        }
        _ => {
            if quantity <= 0 {
                return Err(MovementError::NonPositiveQuantity { transaction_type });
            }
        }
    }

    let StockLevels {
        quantity: on_hand,
        available,
        reserved,
    } = levels;

    let next = match transaction_type {
        TransactionType::Restock | TransactionType::Return => StockLevels {
            quantity: on_hand + quantity,
            available: available + quantity,
            reserved,
        },
        TransactionType::Sale => StockLevels {
            quantity: on_hand - quantity,
            available: available - quantity,
            reserved,
        },
        TransactionType::Reserve => StockLevels {
            quantity: on_hand,
            available: available - quantity,
            reserved: reserved + quantity,
        },
        TransactionType::Release => StockLevels {
            quantity: on_hand,
            available: available + quantity,
            reserved: reserved - quantity,
        },
        TransactionType::Adjustment => StockLevels {
            quantity: on_hand + quantity,
            available: available + quantity,
            reserved,
        },
    };

    if next.quantity < 0 || next.available < 0 || next.reserved < 0 {
        return Err(MovementError::InsufficientStock);
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn levels(quantity: i32, available: i32, reserved: i32) -> StockLevels {
        StockLevels {
            quantity,
            available,
            reserved,
        }
    }

    #[test]
    fn test_restock_adds_to_hand_and_available() {
        let next = apply_movement(levels(2, 1, 1), TransactionType::Restock, 3).expect("restock");
        assert_eq!(next, levels(5, 4, 1));
    }

    #[test]
    fn test_sale_subtracts_available() {
        let next = apply_movement(levels(5, 4, 1), TransactionType::Sale, 2).expect("sale");
        assert_eq!(next, levels(3, 2, 1));
    }

    #[test]
    fn test_sale_beyond_available_rejected() {
        let err = apply_movement(levels(5, 1, 4), TransactionType::Sale, 2).unwrap_err();
        assert_eq!(err, MovementError::InsufficientStock);
    }

    #[test]
    fn test_reserve_and_release_roundtrip() {
        let reserved = apply_movement(levels(5, 5, 0), TransactionType::Reserve, 2).expect("res");
        assert_eq!(reserved, levels(5, 3, 2));
        let released = apply_movement(reserved, TransactionType::Release, 2).expect("rel");
        assert_eq!(released, levels(5, 5, 0));
    }

    #[test]
    fn test_release_more_than_reserved_rejected() {
        let err = apply_movement(levels(5, 4, 1), TransactionType::Release, 2).unwrap_err();
        assert_eq!(err, MovementError::InsufficientStock);
    }

    #[test]
    fn test_return_adds_stock() {
        let next = apply_movement(levels(0, 0, 0), TransactionType::Return, 1).expect("return");
        assert_eq!(next, levels(1, 1, 0));
    }

    #[test]
    fn test_adjustment_takes_signed_delta() {
        let up = apply_movement(levels(4, 3, 1), TransactionType::Adjustment, 2).expect("up");
        assert_eq!(up, levels(6, 5, 1));
        let down = apply_movement(up, TransactionType::Adjustment, -3).expect("down");
        assert_eq!(down, levels(3, 2, 1));
    }

    #[test]
    fn test_adjustment_zero_rejected() {
        let err = apply_movement(levels(4, 3, 1), TransactionType::Adjustment, 0).unwrap_err();
        assert_eq!(err, MovementError::ZeroAdjustment);
    }

    #[test]
    fn test_directional_negative_rejected() {
        let err = apply_movement(levels(4, 3, 1), TransactionType::Restock, -1).unwrap_err();
        assert!(matches!(err, MovementError::NonPositiveQuantity { .. }));
    }
}
