//! Test support for the introspection engine: an in-memory catalog and a
//! connection wrapper that records every query.

mod exec_log;
pub use exec_log::ExecLog;

mod fake_catalog;
pub use fake_catalog::{FakeCatalog, FakeTable};

mod logging_connection;
pub use logging_connection::{LoggingConnection, QueryOp};

/// A small two-schema catalog used across tests.
///
/// `public.orders` references `crm.customers` with a composite key and
/// `public.order_items` references `public.orders`.
pub fn shop() -> FakeCatalog {
    let mut catalog = FakeCatalog::new("shop");
    catalog.describe("Shop database");

    catalog.create_enum("order_status", &["new", "paid", "shipped"]);

    catalog
        .table("crm", "customers")
        .table_comment("People who buy things")
        .column("tenant_id", "integer")
        .not_null()
        .column("id", "bigint")
        .not_null()
        .column("email", "character varying(120)")
        .not_null()
        .comment("Login address")
        .column("created_at", "timestamp with time zone")
        .not_null()
        .default("now()")
        .primary_key("customers_pkey", &["tenant_id", "id"])
        .unique("customers_email_key", &["email"]);

    catalog
        .table("public", "orders")
        .column("id", "integer")
        .not_null()
        .default("nextval('orders_id_seq'::regclass)")
        .column("tenant_id", "integer")
        .not_null()
        .column("customer_id", "bigint")
        .not_null()
        .column("status", "order_status")
        .not_null()
        .default("'new'::order_status")
        .column("tags", "text[]")
        .column("details", "jsonb")
        .primary_key("orders_pkey", &["id"])
        .foreign_key(
            "orders_customer_fkey",
            &["tenant_id", "customer_id"],
            ("crm", "customers"),
            &["tenant_id", "id"],
        )
        .index("orders_customer_idx", &["tenant_id", "customer_id"], false);

    catalog
        .table("public", "order_items")
        .column("order_id", "integer")
        .not_null()
        .column("position", "smallint")
        .not_null()
        .column("quantity", "integer")
        .column("note", "text")
        .primary_key("order_items_pkey", &["order_id", "position"])
        .foreign_key(
            "order_items_order_fkey",
            &["order_id"],
            ("public", "orders"),
            &["id"],
        )
        .not_valid();

    catalog
}
