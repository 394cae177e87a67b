// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use query_derive::{Entity, Row, Value, ValueType};
use uuid::Uuid;

#[derive(Entity)]
#[entity(table = "users", schema = "core")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub age: i32,
    pub score: f64,
    pub active: bool,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Entity)]
pub struct AuditEntry {
    pub id: i64,
    pub r#type: String,
}

fn main() {
    let descriptor = User::descriptor();
    assert_eq!(descriptor.name, "User");
    assert_eq!(descriptor.qualified_table(None), "core.users");
    assert_eq!(descriptor.fields.len(), 7);
    assert_eq!(descriptor.field("age").unwrap().ty, ValueType::Int);
    assert!(descriptor.field("nickname").unwrap().nullable);
    assert!(!descriptor.field("email").unwrap().nullable);
    assert!(std::ptr::eq(descriptor, User::descriptor()));

    let audit = AuditEntry::descriptor();
    assert_eq!(audit.table, "audit_entrys");
    assert_eq!(audit.qualified_table(Some("app")), "app.audit_entrys");
    assert_eq!(audit.columns(), "id, type");

    let row = Row::new()
        .with("id", Value::Int(7))
        .with("type", Value::Text("login".into()));
    let entry = AuditEntry::from_row(&row).unwrap();
    assert_eq!(entry.id, 7);
    assert_eq!(entry.r#type, "login");

    let missing = Row::new().with("id", Value::Int(7));
    assert!(AuditEntry::from_row(&missing).is_err());
}
