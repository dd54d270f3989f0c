//! Record seam over the relational store.
//!
//! Every synchronized entity implements [`StoreRecord`], which gives the batch
//! layer keyed lookups and writes without knowing the concrete table. All
//! methods are generic over [`ConnectionTrait`] so the same code runs on a
//! pooled connection or inside an open transaction.

use std::fmt::{Debug, Display};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};

use crate::{
    Account, Category, Currency, EngineError, Operation, OperationKind, ResultEngine, accounts,
    categories, currencies, currencies::normalize_code, operations,
};

#[async_trait]
pub(crate) trait StoreRecord: Clone + Debug + PartialEq + Send + Sync + Sized + 'static {
    type Key: Clone + Debug + Display + Send + Sync;

    /// Entity name used in logs and batch errors.
    const LABEL: &'static str;

    fn key(&self) -> Self::Key;

    /// Canonical form of a key supplied by a client.
    fn normalize_key(key: Self::Key) -> Self::Key {
        key
    }

    fn normalize(&mut self);

    fn validate(&self) -> ResultEngine<()>;

    /// Carry over stored values the client does not own, or refuse a change
    /// the stored record cannot take.
    fn adopt_stored(&mut self, _stored: &Self) -> ResultEngine<()> {
        Ok(())
    }

    async fn fetch<C>(conn: &C, key: &Self::Key) -> ResultEngine<Option<Self>>
    where
        C: ConnectionTrait;

    /// Insert and return the key the store assigned.
    async fn insert<C>(&self, conn: &C) -> ResultEngine<Self::Key>
    where
        C: ConnectionTrait;

    async fn update<C>(&self, conn: &C) -> ResultEngine<()>
    where
        C: ConnectionTrait;

    /// Delete by key and return the number of removed rows.
    async fn delete<C>(conn: &C, key: &Self::Key) -> ResultEngine<u64>
    where
        C: ConnectionTrait;
}

#[async_trait]
impl StoreRecord for Currency {
    type Key = String;
    const LABEL: &'static str = "currency";

    fn key(&self) -> String {
        self.code.clone()
    }

    fn normalize_key(key: String) -> String {
        normalize_code(&key)
    }

    fn normalize(&mut self) {
        Currency::normalize(self);
    }

    fn validate(&self) -> ResultEngine<()> {
        Currency::validate(self)
    }

    async fn fetch<C>(conn: &C, key: &String) -> ResultEngine<Option<Self>>
    where
        C: ConnectionTrait,
    {
        let model = currencies::Entity::find_by_id(key.clone()).one(conn).await?;
        Ok(model.map(Currency::from))
    }

    async fn insert<C>(&self, conn: &C) -> ResultEngine<String>
    where
        C: ConnectionTrait,
    {
        let model = currencies::ActiveModel::from(self).insert(conn).await?;
        Ok(model.code)
    }

    async fn update<C>(&self, conn: &C) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        currencies::ActiveModel::from(self).update(conn).await?;
        Ok(())
    }

    async fn delete<C>(conn: &C, key: &String) -> ResultEngine<u64>
    where
        C: ConnectionTrait,
    {
        let result = currencies::Entity::delete_by_id(key.clone())
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl StoreRecord for Account {
    type Key = i32;
    const LABEL: &'static str = "account";

    fn key(&self) -> i32 {
        self.id
    }

    fn normalize(&mut self) {
        Account::normalize(self);
    }

    fn validate(&self) -> ResultEngine<()> {
        Account::validate(self)
    }

    async fn fetch<C>(conn: &C, key: &i32) -> ResultEngine<Option<Self>>
    where
        C: ConnectionTrait,
    {
        let model = accounts::Entity::find_by_id(*key).one(conn).await?;
        Ok(model.map(Account::from))
    }

    async fn insert<C>(&self, conn: &C) -> ResultEngine<i32>
    where
        C: ConnectionTrait,
    {
        let model = accounts::new_active(self).insert(conn).await?;
        Ok(model.id)
    }

    async fn update<C>(&self, conn: &C) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        accounts::ActiveModel::from(self).update(conn).await?;
        Ok(())
    }

    async fn delete<C>(conn: &C, key: &i32) -> ResultEngine<u64>
    where
        C: ConnectionTrait,
    {
        let result = accounts::Entity::delete_by_id(*key).exec(conn).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl StoreRecord for Category {
    type Key = i32;
    const LABEL: &'static str = "category";

    fn key(&self) -> i32 {
        self.id
    }

    fn normalize(&mut self) {
        Category::normalize(self);
    }

    fn validate(&self) -> ResultEngine<()> {
        Category::validate(self)
    }

    async fn fetch<C>(conn: &C, key: &i32) -> ResultEngine<Option<Self>>
    where
        C: ConnectionTrait,
    {
        categories::Entity::find_by_id(*key)
            .one(conn)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    async fn insert<C>(&self, conn: &C) -> ResultEngine<i32>
    where
        C: ConnectionTrait,
    {
        let model = categories::new_active(self).insert(conn).await?;
        Ok(model.id)
    }

    async fn update<C>(&self, conn: &C) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        categories::ActiveModel::from(self).update(conn).await?;
        Ok(())
    }

    async fn delete<C>(conn: &C, key: &i32) -> ResultEngine<u64>
    where
        C: ConnectionTrait,
    {
        let result = categories::Entity::delete_by_id(*key).exec(conn).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl StoreRecord for Operation {
    type Key = i64;
    const LABEL: &'static str = "operation";

    fn key(&self) -> i64 {
        self.entry_no
    }

    fn normalize(&mut self) {
        Operation::normalize(self);
    }

    fn validate(&self) -> ResultEngine<()> {
        Operation::validate(self)
    }

    /// A transfer leg keeps its pair number for life, and an operation never
    /// moves into or out of a transfer pair.
    fn adopt_stored(&mut self, stored: &Self) -> ResultEngine<()> {
        let was_transfer = stored.kind == OperationKind::Transfer;
        let is_transfer = self.kind == OperationKind::Transfer;
        if was_transfer != is_transfer {
            return Err(EngineError::ConstraintViolation(format!(
                "operation {} cannot change type from {} to {}",
                stored.entry_no,
                stored.kind.as_str(),
                self.kind.as_str()
            )));
        }
        if is_transfer {
            self.transaction_no = stored.transaction_no;
        }
        Ok(())
    }

    async fn fetch<C>(conn: &C, key: &i64) -> ResultEngine<Option<Self>>
    where
        C: ConnectionTrait,
    {
        operations::Entity::find_by_id(*key)
            .one(conn)
            .await?
            .map(Operation::try_from)
            .transpose()
    }

    async fn insert<C>(&self, conn: &C) -> ResultEngine<i64>
    where
        C: ConnectionTrait,
    {
        let model = operations::new_active(self).insert(conn).await?;
        Ok(model.entry_no)
    }

    async fn update<C>(&self, conn: &C) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        operations::ActiveModel::from(self).update(conn).await?;
        Ok(())
    }

    async fn delete<C>(conn: &C, key: &i64) -> ResultEngine<u64>
    where
        C: ConnectionTrait,
    {
        let result = operations::Entity::delete_by_id(*key).exec(conn).await?;
        Ok(result.rows_affected)
    }
}
