// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use query_derive::{
    Entity, Error, MethodKind, Repository, RepositoryHandle, ResultShape, SessionFactory,
    repository
};
use uuid::Uuid;

#[derive(Debug, Entity)]
#[entity(table = "orders")]
pub struct Order {
    pub id: Uuid,
    pub customer: String,
    pub total: f64,
    pub status: String,
}

#[repository(entity = Order)]
pub trait OrderRepository {
    /// Most recent order of a customer.
    async fn get_by_customer(&self, customer: &str) -> Result<Option<Order>, Error>;

    async fn find_all_by_customer_and_status(
        &self,
        customer: String,
        status: String,
    ) -> Result<Vec<Order>, Error>;

    async fn count_by_status(&self, status: String) -> Result<i64, Error>;

    #[query(sql = "SELECT SUM(total) FROM orders WHERE customer = {customer}")]
    async fn revenue(&self, customer: String) -> Result<Option<f64>, Error>;

    #[query(sql = "DELETE FROM orders WHERE id = {id}", modifying)]
    async fn remove(&self, id: Uuid) -> Result<u64, Error>;

    #[skip]
    async fn describe(&self) -> Result<String, Error> {
        Ok("orders".to_string())
    }
}

fn injectable<F: SessionFactory>(handle: RepositoryHandle<OrderRepositoryDescriptor, F>) -> Arc<dyn OrderRepository> {
    Arc::new(handle)
}

fn main() {
    let _ = injectable::<query_derive_fake::Never>;

    let methods = OrderRepositoryDescriptor::methods();
    assert_eq!(methods.len(), 6);
    assert!(OrderRepositoryDescriptor::NAME.ends_with("::OrderRepository"));

    let kinds: Vec<MethodKind> = methods.iter().map(|m| m.kind()).collect();
    assert_eq!(
        kinds,
        [
            MethodKind::Derived,
            MethodKind::Derived,
            MethodKind::Derived,
            MethodKind::Template,
            MethodKind::Template,
            MethodKind::Skipped,
        ]
    );

    assert_eq!(methods[0].shape(), ResultShape::OptionalSingle);
    assert_eq!(methods[1].shape(), ResultShape::List);
    assert_eq!(methods[1].params().len(), 2);
    assert_eq!(methods[2].shape(), ResultShape::Scalar);
    assert!(!methods[3].is_modifying());
    assert!(methods[4].is_modifying());
}

mod query_derive_fake {
    use query_derive::{Bind, DriverError, Row, Session, SessionFactory, async_trait};

    pub struct Never;

    #[async_trait]
    impl SessionFactory for Never {
        type Session = Never;

        async fn open(&self) -> Result<Never, DriverError> {
            Err("offline".into())
        }
    }

    #[async_trait]
    impl Session for Never {
        async fn fetch(&mut self, _: &str, _: &[Bind]) -> Result<Vec<Row>, DriverError> {
            Ok(Vec::new())
        }

        async fn execute(&mut self, _: &str, _: &[Bind]) -> Result<u64, DriverError> {
            Ok(0)
        }

        async fn commit(self) -> Result<(), DriverError> {
            Ok(())
        }

        async fn rollback(self) -> Result<(), DriverError> {
            Ok(())
        }
    }
}
