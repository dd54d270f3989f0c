//! Classification of incoming records against stored state.

use sea_orm::ConnectionTrait;

use crate::{ResultEngine, store::StoreRecord};

/// How a candidate record relates to what is persisted under its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    New,
    Modified,
    Unchanged,
}

/// Pure comparison. Equality is the record's own `PartialEq`, so decimal
/// amounts compare numerically.
pub fn compare<T: PartialEq>(candidate: &T, stored: Option<&T>) -> Change {
    match stored {
        None => Change::New,
        Some(stored) if stored == candidate => Change::Unchanged,
        Some(_) => Change::Modified,
    }
}

/// Look the candidate up by key and classify it.
///
/// The candidate must already be normalized. Values the client does not own
/// are copied from the stored row before comparing, and a change the stored
/// row refuses is an error. A failed lookup is an error, never a `New`.
pub(crate) async fn classify<R, C>(conn: &C, candidate: &mut R) -> ResultEngine<Change>
where
    R: StoreRecord,
    C: ConnectionTrait,
{
    let stored = R::fetch(conn, &candidate.key()).await?;
    if let Some(stored) = &stored {
        candidate.adopt_stored(stored)?;
    }
    Ok(compare(candidate, stored.as_ref()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::{Currency, EngineError, Operation, OperationKind, store::StoreRecord};

    fn transfer(amount: Decimal) -> Operation {
        Operation {
            entry_no: 4,
            date_time: NaiveDate::from_ymd_opt(2024, 4, 7)
                .and_then(|d| d.and_hms_opt(0, 36, 0))
                .unwrap(),
            kind: OperationKind::Transfer,
            amount,
            source_id: 1,
            currency_code: "GEL".to_string(),
            category_id: 2,
            transaction_no: 9,
            description: "to savings".to_string(),
        }
    }

    #[test]
    fn missing_record_is_new() {
        let currency = Currency::new("USD", None);
        assert_eq!(compare(&currency, None), Change::New);
    }

    #[test]
    fn description_change_is_modified() {
        let stored = Currency::new("USD", None);
        let candidate = Currency::new("USD", Some("dollar"));
        assert_eq!(compare(&candidate, Some(&stored)), Change::Modified);
    }

    #[test]
    fn amounts_compare_numerically() {
        let stored = transfer(Decimal::new(-10, 0));
        let candidate = transfer(Decimal::new(-1000, 2));
        assert_eq!(compare(&candidate, Some(&stored)), Change::Unchanged);
    }

    #[test]
    fn foreign_key_change_is_modified() {
        let stored = transfer(Decimal::new(-10, 0));
        let mut candidate = stored.clone();
        candidate.source_id = 2;
        assert_eq!(compare(&candidate, Some(&stored)), Change::Modified);
    }

    #[test]
    fn stored_transfer_number_wins_over_the_candidate() {
        let stored = transfer(Decimal::new(-10, 0));
        let mut candidate = stored.clone();
        candidate.transaction_no = 0;
        candidate.adopt_stored(&stored).unwrap();
        assert_eq!(candidate.transaction_no, 9);
        assert_eq!(compare(&candidate, Some(&stored)), Change::Unchanged);
    }

    #[test]
    fn operation_cannot_join_or_leave_a_pair() {
        let stored = transfer(Decimal::new(10, 0));
        let mut income = stored.clone();
        income.kind = OperationKind::Income;
        assert!(matches!(
            income.adopt_stored(&stored),
            Err(EngineError::ConstraintViolation(_))
        ));

        let mut candidate = stored.clone();
        let mut stored = stored;
        stored.kind = OperationKind::Income;
        stored.transaction_no = 0;
        assert!(matches!(
            candidate.adopt_stored(&stored),
            Err(EngineError::ConstraintViolation(_))
        ));
    }
}
