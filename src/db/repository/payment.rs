use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::ensure_changed;

/// All payments with their type name, newest first.
pub fn list_payments(conn: &Connection) -> Result<Vec<PaymentRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.PaymentId, p.ServiceRecordId, p.PaymentDate,
                p.Amount, pt.PaymentTypeName, p.Payer
         FROM Payment p
         JOIN PaymentType pt ON pt.PaymentTypeId = p.PaymentTypeId
         ORDER BY p.PaymentId DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PaymentRow {
            payment_id: row.get(0)?,
            service_record_id: row.get(1)?,
            payment_date: row.get(2)?,
            amount: row.get(3)?,
            payment_type_name: row.get(4)?,
            payer: row.get(5)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn insert_payment(conn: &Connection, form: &PaymentForm) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Payment (ServiceRecordId, PaymentDate, Amount, PaymentTypeId, Payer)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            form.service_record_id,
            form.payment_date.to_string(),
            form.amount,
            form.payment_type_id,
            form.payer.trim(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_payment(conn: &Connection, payment_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM Payment WHERE PaymentId = ?1", [payment_id])?;
    ensure_changed(changed, "Payment", payment_id)
}
