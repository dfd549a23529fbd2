use serde::{Deserialize, Serialize};

use bookshop_core::{BookId, DomainError, DomainResult, OrderId};

/// Transient order request: which book, how many units.
///
/// Shaped and typed at the API boundary before it reaches the operation;
/// created per request, discarded after the submission completes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub book_id: BookId,
    pub quantity: i64,
}

impl Order {
    pub fn new(book_id: BookId, quantity: i64) -> Self {
        Self {
            order_id: OrderId::new(),
            book_id,
            quantity,
        }
    }
}

/// Result of a successful submission: the post-decrement stock level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub book_id: BookId,
    pub quantity: i64,
    pub stock: i64,
}

/// Pure predicate: an order quantity must be strictly positive.
pub fn validate_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::invalid_quantity(quantity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_quantities_pass() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1_000_000).is_ok());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert_eq!(
            validate_quantity(0).unwrap_err(),
            DomainError::InvalidQuantity(0)
        );
    }

    proptest! {
        #[test]
        fn all_non_positive_quantities_are_rejected(quantity in i64::MIN..=0) {
            prop_assert_eq!(
                validate_quantity(quantity).unwrap_err(),
                DomainError::InvalidQuantity(quantity)
            );
        }

        #[test]
        fn all_positive_quantities_pass(quantity in 1..=i64::MAX) {
            prop_assert!(validate_quantity(quantity).is_ok());
        }
    }
}
