use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operation and category kind as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Income,
    Expense,
    Transfer,
}

pub mod currency {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Currency {
        pub code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Key of a currency to delete. Other fields of a full record are ignored.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CurrencyKey {
        pub code: String,
    }
}

pub mod account {
    use super::*;

    /// `id` is ignored for records the server does not know yet; the store
    /// assigns one.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Account {
        #[serde(default)]
        pub id: i32,
        pub name: String,
        pub currency_code: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountKey {
        pub id: i32,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountStatistic {
        pub account_id: i32,
        pub name: String,
        pub total: Decimal,
        pub currency_code: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(default)]
        pub id: i32,
        #[serde(rename = "type")]
        pub kind: OperationType,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryKey {
        pub id: i32,
    }
}

pub mod operation {
    use super::*;

    /// A ledger entry.
    ///
    /// `dateTime` is written as `YYYY-MM-DDTHH:MM` with no seconds and no
    /// zone. `amount` is accepted as a JSON number or string and always
    /// written as a string so no precision is lost.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Operation {
        #[serde(default)]
        pub entry_no: i64,
        #[serde(with = "minute_format")]
        pub date_time: NaiveDateTime,
        #[serde(rename = "type")]
        pub kind: OperationType,
        pub amount: Decimal,
        pub source_id: i32,
        pub currency_code: String,
        pub category_id: i32,
        #[serde(default)]
        pub transaction_no: i64,
        #[serde(default)]
        pub description: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OperationKey {
        pub entry_no: i64,
    }

    pub mod minute_format {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

        pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(&value.format(FORMAT))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(|err| {
                D::Error::custom(format!(
                    "invalid dateTime '{raw}', expected YYYY-MM-DDTHH:MM: {err}"
                ))
            })
        }
    }
}

/// Counters returned by every POST and DELETE.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub absent: usize,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    use super::{OperationType, operation::Operation};

    #[test]
    fn operation_reads_camel_case_fields() {
        let op: Operation = serde_json::from_value(json!({
            "entryNo": 3,
            "dateTime": "2024-04-07T00:36",
            "type": "Transfer",
            "amount": -150.25,
            "sourceId": 1,
            "currencyCode": "GEL",
            "categoryId": 2,
            "transactionNo": 0,
            "description": "to savings"
        }))
        .unwrap();
        assert_eq!(op.entry_no, 3);
        assert_eq!(op.kind, OperationType::Transfer);
        assert_eq!(op.amount.to_string(), "-150.25");
        assert_eq!(op.date_time.minute(), 36);
    }

    #[test]
    fn operation_writes_minutes_and_string_amount() {
        let op = Operation {
            entry_no: 1,
            date_time: NaiveDate::from_ymd_opt(2024, 4, 7)
                .and_then(|d| d.and_hms_opt(9, 5, 0))
                .unwrap(),
            kind: OperationType::Income,
            amount: "1000.10".parse().unwrap(),
            source_id: 1,
            currency_code: "GEL".to_string(),
            category_id: 1,
            transaction_no: 0,
            description: String::new(),
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["dateTime"], "2024-04-07T09:05");
        assert_eq!(value["amount"], "1000.10");
    }

    #[test]
    fn seconds_in_date_time_are_rejected() {
        let result: Result<Operation, _> = serde_json::from_value(json!({
            "dateTime": "2024-04-07T00:36:10",
            "type": "Income",
            "amount": "1",
            "sourceId": 1,
            "currencyCode": "GEL",
            "categoryId": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<super::category::Category, _> = serde_json::from_value(json!({
            "id": 1,
            "type": "Refund",
            "name": "Back"
        }));
        assert!(result.is_err());
    }
}
