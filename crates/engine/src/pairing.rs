//! Transfer pairing.
//!
//! A transfer arrives as two operations: a negative outflow leg and a
//! non-negative inflow leg. Legs are paired in arrival order and both receive
//! the same `transaction_no`. The machine lives for one batch only.

use sea_orm::{ConnectionTrait, EntityTrait, QuerySelect, sea_query::Expr};

use crate::{EngineError, Operation, ResultEngine, operations};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferPairing {
    #[default]
    Idle,
    OneLegOpen {
        transaction_no: i64,
        outflow: bool,
        inflow: bool,
    },
}

impl TransferPairing {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Open a new pair numbered `transaction_no`.
    pub fn start_pair(&mut self, transaction_no: i64) {
        *self = Self::OneLegOpen {
            transaction_no,
            outflow: false,
            inflow: false,
        };
    }

    /// Place one leg in the open pair and return its number.
    ///
    /// Returns `None` when no pair is open. A second leg with the same sign as
    /// the first joins the same pair and leaves it open.
    pub fn place_leg(&mut self, leg: &Operation) -> Option<i64> {
        let Self::OneLegOpen {
            transaction_no,
            outflow,
            inflow,
        } = self
        else {
            return None;
        };
        let number = *transaction_no;
        let repeated = if leg.is_outflow() {
            std::mem::replace(outflow, true)
        } else {
            std::mem::replace(inflow, true)
        };
        if repeated {
            tracing::warn!(
                transaction_no = number,
                amount = %leg.amount,
                "transfer leg repeats the sign of the open leg, pair stays open"
            );
        }
        if *outflow && *inflow {
            *self = Self::Idle;
        }
        Some(number)
    }
}

/// Highest transaction number in use, 0 when there are no operations.
pub(crate) async fn max_transaction_no<C: ConnectionTrait>(conn: &C) -> ResultEngine<i64> {
    let max = operations::Entity::find()
        .select_only()
        .column_as(
            Expr::col(operations::Column::TransactionNo).max(),
            "max_transaction_no",
        )
        .into_tuple::<Option<i64>>()
        .one(conn)
        .await?;
    Ok(max.flatten().unwrap_or(0))
}

/// Number for a pair opened now: one above the highest in use.
pub(crate) async fn next_transaction_no<C: ConnectionTrait>(conn: &C) -> ResultEngine<i64> {
    let max = max_transaction_no(conn).await?;
    max.checked_add(1).ok_or_else(|| {
        EngineError::ConstraintViolation(format!(
            "transaction number {max} is the largest possible, no new pair can be opened"
        ))
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::OperationKind;

    fn leg(amount: i64) -> Operation {
        Operation {
            entry_no: 0,
            date_time: NaiveDate::from_ymd_opt(2024, 4, 7)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap(),
            kind: OperationKind::Transfer,
            amount: Decimal::new(amount, 0),
            source_id: 1,
            currency_code: "GEL".to_string(),
            category_id: 3,
            transaction_no: 0,
            description: String::new(),
        }
    }

    #[test]
    fn idle_machine_places_nothing() {
        let mut pairing = TransferPairing::default();
        assert_eq!(pairing.place_leg(&leg(1)), None);
        assert!(pairing.is_idle());
    }

    #[test]
    fn opposite_legs_close_the_pair() {
        let mut pairing = TransferPairing::default();
        pairing.start_pair(7);
        assert_eq!(pairing.place_leg(&leg(-50)), Some(7));
        assert!(!pairing.is_idle());
        assert_eq!(pairing.place_leg(&leg(50)), Some(7));
        assert!(pairing.is_idle());
    }

    #[test]
    fn inflow_first_also_pairs() {
        let mut pairing = TransferPairing::default();
        pairing.start_pair(1);
        pairing.place_leg(&leg(5));
        pairing.place_leg(&leg(-5));
        assert!(pairing.is_idle());
    }

    #[test]
    fn same_sign_legs_keep_the_pair_open() {
        let mut pairing = TransferPairing::default();
        pairing.start_pair(3);
        assert_eq!(pairing.place_leg(&leg(-1)), Some(3));
        assert_eq!(pairing.place_leg(&leg(-2)), Some(3));
        assert_eq!(
            pairing,
            TransferPairing::OneLegOpen {
                transaction_no: 3,
                outflow: true,
                inflow: false,
            }
        );
        assert_eq!(pairing.place_leg(&leg(3)), Some(3));
        assert!(pairing.is_idle());
    }

    #[test]
    fn zero_amount_counts_as_inflow() {
        let mut pairing = TransferPairing::default();
        pairing.start_pair(2);
        pairing.place_leg(&leg(0));
        assert_eq!(
            pairing,
            TransferPairing::OneLegOpen {
                transaction_no: 2,
                outflow: false,
                inflow: true,
            }
        );
    }
}
