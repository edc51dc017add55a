use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Append-only ledger row for one applied external event.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::webhook_events)]
pub struct WebhookEvent {
    pub id: i32,
    pub event_id: String,
    pub resource_type: String,
    pub action: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::webhook_events)]
pub struct NewWebhookEvent<'a> {
    pub event_id: &'a str,
    pub resource_type: &'a str,
    pub action: &'a str,
}
