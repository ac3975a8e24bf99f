//! Admin workspace: user accounts, staff, payments and system definitions.

use rusqlite::Connection;
use serde::Serialize;

use super::{open_workspace, required_text, CommandError};
use crate::core_state::{CoreState, Workspace};
use crate::crud::catalog::{catalog_table, CATALOG_TABLES};
use crate::crud::{CrudTable, FormValues, Grid, GridRow};
use crate::crypto::hash_password_with_iterations;
use crate::db;
use crate::models::*;

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub users: Vec<UserAccountRow>,
    pub staff: Vec<StaffRow>,
    pub payments: Vec<PaymentRow>,
    pub definitions: Vec<&'static str>,
}

pub fn load_overview(state: &CoreState) -> Result<AdminOverview, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(AdminOverview {
        users: db::list_user_accounts(&conn)?,
        staff: db::list_staff(&conn)?,
        payments: db::list_payments(&conn)?,
        definitions: CATALOG_TABLES.to_vec(),
    })
}

/// Picker contents for the admin forms.
#[derive(Debug, Clone, Serialize)]
pub struct AdminLookups {
    pub roles: Vec<LookupOption>,
    pub departments: Vec<LookupOption>,
    pub staff: Vec<LookupOption>,
    pub patients: Vec<LookupOption>,
    pub payment_types: Vec<LookupOption>,
    pub service_records: Vec<LookupOption>,
}

pub fn load_lookups(state: &CoreState) -> Result<AdminLookups, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(AdminLookups {
        roles: db::load_roles(&conn)?,
        departments: db::load_departments(&conn)?,
        staff: db::load_active_staff(&conn)?,
        patients: db::load_active_patients(&conn)?,
        payment_types: db::load_payment_types(&conn)?,
        service_records: db::load_service_record_options(&conn)?,
    })
}

// ── Users ──────────────────────────────────────────────────

pub fn list_users(state: &CoreState) -> Result<Vec<UserAccountRow>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(db::list_user_accounts(&conn)?)
}

/// Normalize a user form and apply the role/linkage rule: the patient role
/// links a patient and never a staff member, every other role the reverse.
fn check_user_form(conn: &Connection, form: &UserForm) -> Result<UserForm, CommandError> {
    let username = required_text(&form.username, "Username is required.")?;
    let role_name = db::get_role_name(conn, form.role_id)?
        .ok_or_else(|| CommandError::Validation("Role must be selected.".into()))?;

    let (staff_id, patient_id) = if role_name.trim().eq_ignore_ascii_case("patient") {
        let patient = form.patient_id.ok_or_else(|| {
            CommandError::Validation("Patient must be selected for Patient role.".into())
        })?;
        (None, Some(patient))
    } else {
        let staff = form.staff_id.ok_or_else(|| {
            CommandError::Validation("Staff must be selected for staff roles.".into())
        })?;
        (Some(staff), None)
    };

    Ok(UserForm {
        username,
        password: form.password.clone(),
        role_id: form.role_id,
        staff_id,
        patient_id,
        is_active: form.is_active,
    })
}

pub fn add_user(state: &CoreState, form: &UserForm) -> Result<i64, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    let form = check_user_form(&conn, form)?;
    if form.password.is_empty() {
        return Err(CommandError::Validation("Password is required for new user.".into()));
    }
    let hash = hash_password_with_iterations(&form.password, state.password_iterations())?;
    let user_id = db::insert_user_account(&conn, &form, &hash)?;
    tracing::info!(user_id, "User added");
    Ok(user_id)
}

/// Update a user. A blank password keeps the stored hash.
pub fn edit_user(state: &CoreState, user_id: i64, form: &UserForm) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    let form = check_user_form(&conn, form)?;
    let hash = if form.password.is_empty() {
        None
    } else {
        Some(hash_password_with_iterations(&form.password, state.password_iterations())?)
    };
    db::update_user_account(&conn, user_id, &form, hash.as_deref())?;
    tracing::info!(user_id, password_changed = hash.is_some(), "User updated");
    Ok(())
}

/// Flip the active flag; returns the new value.
pub fn toggle_user_active(state: &CoreState, user_id: i64) -> Result<bool, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    let user = db::get_user_account(&conn, user_id)?
        .ok_or_else(|| CommandError::Informational("Select a user row first.".into()))?;
    db::set_user_active(&conn, user_id, !user.is_active)?;
    tracing::info!(user_id, active = !user.is_active, "User active flag toggled");
    Ok(!user.is_active)
}

pub fn delete_user(state: &CoreState, user_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    db::delete_user_account(&conn, user_id)?;
    tracing::info!(user_id, "User deleted");
    Ok(())
}

// ── Staff ──────────────────────────────────────────────────

pub fn list_staff(state: &CoreState) -> Result<Vec<StaffRow>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(db::list_staff(&conn)?)
}

fn check_staff_form(form: &StaffForm) -> Result<(), CommandError> {
    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        return Err(CommandError::Validation(
            "FirstName and LastName are required.".into(),
        ));
    }
    if form.department_id.is_none() {
        return Err(CommandError::Validation("Department must be selected.".into()));
    }
    Ok(())
}

pub fn add_staff(state: &CoreState, form: &StaffForm) -> Result<i64, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    check_staff_form(form)?;
    let staff_id = db::insert_staff(&conn, form)?;
    tracing::info!(staff_id, "Staff added");
    Ok(staff_id)
}

pub fn edit_staff(state: &CoreState, staff_id: i64, form: &StaffForm) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    check_staff_form(form)?;
    db::update_staff(&conn, staff_id, form)?;
    tracing::info!(staff_id, "Staff updated");
    Ok(())
}

pub fn toggle_staff_active(state: &CoreState, staff_id: i64) -> Result<bool, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    let staff = db::get_staff(&conn, staff_id)?
        .ok_or_else(|| CommandError::Informational("Select a staff row first.".into()))?;
    db::set_staff_active(&conn, staff_id, !staff.is_active)?;
    tracing::info!(staff_id, active = !staff.is_active, "Staff active flag toggled");
    Ok(!staff.is_active)
}

pub fn delete_staff(state: &CoreState, staff_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    db::delete_staff(&conn, staff_id)?;
    tracing::info!(staff_id, "Staff deleted");
    Ok(())
}

// ── Payments ───────────────────────────────────────────────

pub fn list_payments(state: &CoreState) -> Result<Vec<PaymentRow>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(db::list_payments(&conn)?)
}

pub fn add_payment(state: &CoreState, form: &PaymentForm) -> Result<i64, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;

    if db::load_payment_types(&conn)?.is_empty() {
        return Err(CommandError::Informational(
            "No PaymentType found. Add PaymentType first.".into(),
        ));
    }
    if db::load_service_record_options(&conn)?.is_empty() {
        return Err(CommandError::Informational(
            "No ServiceRecord found. Doctor must create ServiceRecords first.".into(),
        ));
    }
    if form.amount.is_nan() || form.amount <= 0.0 {
        return Err(CommandError::Validation("Amount must be > 0.".into()));
    }
    required_text(&form.payer, "Payer is required.")?;

    let payment_id = db::insert_payment(&conn, form)?;
    tracing::info!(payment_id, service_record_id = form.service_record_id, "Payment added");
    Ok(payment_id)
}

pub fn delete_payment(state: &CoreState, payment_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    db::delete_payment(&conn, payment_id)?;
    tracing::info!(payment_id, "Payment deleted");
    Ok(())
}

// ── System definitions ─────────────────────────────────────

pub fn definition_names() -> &'static [&'static str] {
    CATALOG_TABLES
}

/// Table description for a catalog name, for rendering the edit form.
pub fn definition_table(name: &str) -> Result<CrudTable, CommandError> {
    catalog_table(name)
        .ok_or_else(|| CommandError::Validation(format!("Unknown definition table: {name}")))
}

pub fn list_definitions(state: &CoreState, name: &str) -> Result<Grid, CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.list(&conn)?)
}

pub fn fetch_definition(state: &CoreState, name: &str, key: i64) -> Result<GridRow, CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.fetch(&conn, key)?)
}

pub fn add_definition(state: &CoreState, name: &str, form: &FormValues) -> Result<i64, CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.add(&conn, form)?)
}

pub fn edit_definition(
    state: &CoreState,
    name: &str,
    key: i64,
    form: &FormValues,
) -> Result<(), CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.edit(&conn, key, form)?)
}

pub fn delete_definition(state: &CoreState, name: &str, key: i64) -> Result<(), CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.delete(&conn, key)?)
}

pub fn definition_options(
    state: &CoreState,
    name: &str,
    column: &str,
) -> Result<Vec<LookupOption>, CommandError> {
    let table = definition_table(name)?;
    let (_, conn) = open_workspace(state, Workspace::Admin)?;
    Ok(table.options(&conn, column)?)
}
