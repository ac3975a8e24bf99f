//! Session router: login opens the workspace matching the role,
//! logout returns to the login state.

use serde::Serialize;

use super::{admin, doctor, receptionist, CommandError};
use crate::auth::{self, LoginCredentials};
use crate::core_state::{CoreState, Workspace};
use crate::crypto::hash_password_with_iterations;
use crate::db;
use crate::models::{Session, StaffForm, UserForm};

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub workspace: Workspace,
    pub session: Session,
}

/// Authenticate and open the workspace for the user's role.
///
/// A role without a desktop workspace is rejected and leaves the session
/// untouched. A successful login replaces any previous session.
pub fn login(state: &CoreState, username: &str, password: &str) -> Result<LoginOutcome, CommandError> {
    let credentials = LoginCredentials::try_from_parts(username, password)?;
    let conn = state.open_db()?;

    let session = auth::login(&conn, &credentials)?
        .ok_or_else(|| CommandError::Validation("Invalid credentials or inactive user.".into()))?;

    let Some(workspace) = Workspace::from_role_name(&session.role_name) else {
        tracing::warn!(user_id = session.user_id, role = %session.role_name, "No workspace for role");
        return Err(CommandError::Validation(format!(
            "Unknown role: {}",
            session.role_name
        )));
    };

    state.set_session(session.clone())?;
    tracing::info!(user_id = session.user_id, %workspace, "Workspace opened");
    Ok(LoginOutcome { workspace, session })
}

pub fn logout(state: &CoreState) -> Result<(), CommandError> {
    state.clear_session()?;
    tracing::info!("Logged out");
    Ok(())
}

/// Initial data of the signed-in workspace.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "workspace", rename_all = "snake_case")]
pub enum WorkspaceData {
    Admin(admin::AdminOverview),
    Doctor(doctor::DoctorOverview),
    Receptionist(receptionist::ReceptionOverview),
}

pub fn load_workspace(state: &CoreState) -> Result<WorkspaceData, CommandError> {
    let session = state.current_session()?;
    match Workspace::from_role_name(&session.role_name) {
        Some(Workspace::Admin) => Ok(WorkspaceData::Admin(admin::load_overview(state)?)),
        Some(Workspace::Doctor) => Ok(WorkspaceData::Doctor(doctor::load_overview(state)?)),
        Some(Workspace::Receptionist) => Ok(WorkspaceData::Receptionist(
            receptionist::load_overview(state)?,
        )),
        None => Err(CommandError::Validation(format!(
            "Unknown role: {}",
            session.role_name
        ))),
    }
}

/// Create the first `admin` account when the database has no users.
///
/// Returns `true` when an account was created.
pub fn bootstrap_admin(state: &CoreState, password: &str) -> Result<bool, CommandError> {
    let mut conn = state.open_db()?;
    let tx = conn.transaction()?;

    if db::count_user_accounts(&tx)? > 0 {
        return Ok(false);
    }

    let role_id = db::load_roles(&tx)?
        .into_iter()
        .find(|r| Workspace::from_role_name(&r.name) == Some(Workspace::Admin))
        .map(|r| r.id)
        .ok_or_else(|| CommandError::Informational("No Admin role found in Role.".into()))?;

    let staff_id = db::insert_staff(
        &tx,
        &StaffForm {
            first_name: "System".into(),
            last_name: "Administrator".into(),
            title: "System Administrator".into(),
            is_active: true,
            ..Default::default()
        },
    )?;

    let hash = hash_password_with_iterations(password, state.password_iterations())?;
    let form = UserForm {
        username: "admin".into(),
        role_id,
        staff_id: Some(staff_id),
        is_active: true,
        ..Default::default()
    };
    let user_id = db::insert_user_account(&tx, &form, &hash)?;
    tx.commit()?;

    tracing::info!(user_id, "Bootstrap admin account created");
    Ok(true)
}
