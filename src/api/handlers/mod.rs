use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hermes_core::commands::{CreateMilestoneInput, UpdateIterationInput};
use hermes_core::governance::{
    auto_advance_phase, MilestoneValidation, PhaseValidation, ReleaseValidation,
};
use hermes_core::models::{
    BudgetTransaction, CreateIterationInput, Iteration, Milestone, PhaseResult, Project,
};
use hermes_core::progress::ProjectMetrics;
use hermes_core::{tailoring, Catalog, GovernanceError};
use uuid::Uuid;

use crate::db::Database;
use crate::models::*;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a rejected command to a client error.
fn governance_error(e: &GovernanceError) -> (StatusCode, String) {
    let status = match e {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        GovernanceError::InvalidTransition { .. }
        | GovernanceError::CriteriaNotMet(_)
        | GovernanceError::DuplicateIteration(_)
        | GovernanceError::NotReleaseCandidate(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Rejected command: {}", e);
    (status, e.to_string())
}

/// Log an internal error and return a sanitized response to the client.
/// Governance errors carried inside are exposed as client errors; everything
/// else is logged server-side and reported as a generic message.
fn internal_error(e: anyhow::Error) -> (StatusCode, String) {
    if let Some(governance) = e.downcast_ref::<GovernanceError>() {
        return governance_error(governance);
    }

    tracing::error!("Internal error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn project_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Project not found".to_string())
}

/// Run a command against a stored project and return its value.
fn update<T>(
    db: &Database,
    id: Uuid,
    f: impl FnOnce(&mut Project) -> Result<T, GovernanceError>,
) -> ApiResult<(StoredProject, T)> {
    db.update_project(id, f)
        .map_err(internal_error)?
        .ok_or_else(project_not_found)
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(db): State<Database>) -> ApiResult<impl IntoResponse> {
    let project_count = db.count_projects().map_err(internal_error)?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "project_count": project_count,
    })))
}

pub async fn statistics(State(db): State<Database>) -> ApiResult<Json<Statistics>> {
    db.statistics().map(Json).map_err(internal_error)
}

pub async fn get_catalog(State(catalog): State<Arc<Catalog>>) -> Json<Catalog> {
    Json(catalog.as_ref().clone())
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(State(db): State<Database>) -> ApiResult<Json<Vec<ProjectSummary>>> {
    db.list_projects().map(Json).map_err(internal_error)
}

pub async fn get_project(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StoredProject>> {
    db.get_project(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(project_not_found)
}

pub async fn create_project(
    State(db): State<Database>,
    State(catalog): State<Arc<Catalog>>,
    Json(input): Json<CreateProjectInput>,
) -> ApiResult<(StatusCode, Json<StoredProject>)> {
    let project =
        Project::initialize(input.master_data, &catalog).map_err(|e| governance_error(&e))?;
    db.create_project(project)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(internal_error)
}

pub async fn update_project(
    State(db): State<Database>,
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProjectInput>,
) -> ApiResult<Json<StoredProject>> {
    let (stored, ()) = update(&db, id, |project| {
        let master = &mut project.master_data;
        if let Some(name) = input.project_name {
            if name.trim().is_empty() {
                return Err(GovernanceError::MissingProjectName);
            }
            master.project_name = name;
        }
        if let Some(client) = input.client {
            master.client = client;
        }
        if let Some(manager) = input.project_manager {
            master.project_manager = manager;
        }
        if let Some(representative) = input.user_representative {
            master.user_representative = representative;
        }
        if input.start_date.is_some() {
            master.start_date = input.start_date;
        }
        if let Some(budget) = input.budget {
            master.budget = budget;
        }

        let missing = hermes_core::validate_minimal_roles(master);
        if !missing.is_empty() {
            return Err(GovernanceError::MissingRoles(missing));
        }
        if let Some(size) = input.project_size {
            project.change_size(size, &catalog);
        }
        if let Some(approach) = input.approach {
            project.change_approach(approach, &catalog)?;
        }
        Ok(())
    })?;
    Ok(Json(stored))
}

pub async fn delete_project(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if db.delete_project(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(project_not_found())
    }
}

pub async fn project_health(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectHealth>> {
    let stored = db
        .get_project(id)
        .map_err(internal_error)?
        .ok_or_else(project_not_found)?;

    Ok(Json(ProjectHealth {
        id: stored.id,
        project_name: stored.project.master_data.project_name.clone(),
        current_phase: stored.project.master_data.current_phase.clone(),
        metrics: ProjectMetrics::of(&stored.project),
        updated_at: stored.updated_at,
    }))
}

pub async fn apply_tailoring(
    State(db): State<Database>,
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StoredProject>> {
    let (stored, ()) = update(&db, id, |project| {
        tailoring::apply_tailoring(project, &catalog);
        Ok(())
    })?;
    Ok(Json(stored))
}

pub async fn add_budget_transaction(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(transaction): Json<BudgetTransaction>,
) -> ApiResult<(StatusCode, Json<ProjectMetrics>)> {
    let (stored, ()) = update(&db, id, |project| {
        project.add_budget_transaction(transaction);
        Ok(())
    })?;
    Ok((StatusCode::CREATED, Json(ProjectMetrics::of(&stored.project))))
}

// ============================================================
// Documents
// ============================================================

pub async fn set_document_status(
    State(db): State<Database>,
    Path((id, name)): Path<(Uuid, String)>,
    Json(input): Json<SetDocumentStatusInput>,
) -> ApiResult<Json<DocumentStatusResponse>> {
    let (stored, result_synced) = update(&db, id, |project| {
        project.set_document_status(&name, input.status)
    })?;
    let document = stored
        .project
        .document(&name)
        .cloned()
        .ok_or_else(|| governance_error(&GovernanceError::DocumentNotFound(name)))?;
    Ok(Json(DocumentStatusResponse {
        document,
        result_synced,
    }))
}

// ============================================================
// Phases
// ============================================================

pub async fn add_result(
    State(db): State<Database>,
    State(catalog): State<Arc<Catalog>>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(input): Json<AddResultInput>,
) -> ApiResult<(StatusCode, Json<PhaseResult>)> {
    let (_, result) = update(&db, id, |project| {
        project
            .add_result_from_template(&key, &input.template, &catalog)
            .cloned()
    })?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn set_result_status(
    State(db): State<Database>,
    Path((id, key, name)): Path<(Uuid, String, String)>,
    Json(input): Json<SetResultStatusInput>,
) -> ApiResult<Json<PhaseResult>> {
    let (_, result) = update(&db, id, |project| {
        project.set_result_status(&key, &name, input.status)?;
        project
            .phase(&key)
            .and_then(|phase| phase.result(&name))
            .cloned()
            .ok_or_else(|| GovernanceError::ResultNotFound(name.clone()))
    })?;
    Ok(Json(result))
}

pub async fn set_checklist_item(
    State(db): State<Database>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(input): Json<SetChecklistItemInput>,
) -> ApiResult<Json<PhaseValidation>> {
    let (_, validation) = update(&db, id, |project| {
        project.set_checklist_item(&key, &input.item, input.checked)?;
        project.phase_validation(&key)
    })?;
    Ok(Json(validation))
}

pub async fn phase_validation(
    State(db): State<Database>,
    Path((id, key)): Path<(Uuid, String)>,
) -> ApiResult<Json<PhaseValidation>> {
    let stored = db
        .get_project(id)
        .map_err(internal_error)?
        .ok_or_else(project_not_found)?;
    stored
        .project
        .phase_validation(&key)
        .map(Json)
        .map_err(|e| governance_error(&e))
}

pub async fn complete_phase(
    State(db): State<Database>,
    Path((id, key)): Path<(Uuid, String)>,
) -> ApiResult<Json<StoredProject>> {
    let (stored, _) = update(&db, id, |project| project.complete_phase(&key))?;
    Ok(Json(stored))
}

pub async fn advance_phase(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdvanceResponse>> {
    let (stored, advanced) = update(&db, id, |project| Ok(auto_advance_phase(project)))?;
    Ok(Json(AdvanceResponse {
        advanced,
        current_phase: stored.project.master_data.current_phase,
    }))
}

// ============================================================
// Milestones
// ============================================================

pub async fn add_milestone(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateMilestoneInput>,
) -> ApiResult<(StatusCode, Json<Milestone>)> {
    let (stored, index) = update(&db, id, |project| Ok(project.add_milestone(input)))?;
    let milestone = stored.project.milestones[index].clone();
    Ok((StatusCode::CREATED, Json(milestone)))
}

pub async fn milestone_validation(
    State(db): State<Database>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> ApiResult<Json<MilestoneValidation>> {
    let stored = db
        .get_project(id)
        .map_err(internal_error)?
        .ok_or_else(project_not_found)?;
    stored
        .project
        .milestone_validation(index)
        .map(Json)
        .map_err(|e| governance_error(&e))
}

pub async fn reach_milestone(
    State(db): State<Database>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> ApiResult<Json<Milestone>> {
    let (_, milestone) = update(&db, id, |project| {
        project.reach_milestone(index).cloned()
    })?;
    Ok(Json(milestone))
}

// ============================================================
// Iterations
// ============================================================

pub async fn add_iteration(
    State(db): State<Database>,
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateIterationInput>,
) -> ApiResult<(StatusCode, Json<Iteration>)> {
    let (_, iteration) = update(&db, id, |project| {
        project.add_iteration(input, &catalog).cloned()
    })?;
    Ok((StatusCode::CREATED, Json(iteration)))
}

pub async fn update_iteration(
    State(db): State<Database>,
    Path((id, number)): Path<(Uuid, u32)>,
    Json(input): Json<UpdateIterationInput>,
) -> ApiResult<Json<Iteration>> {
    let (_, iteration) = update(&db, id, |project| {
        project.update_iteration(number, input).cloned()
    })?;
    Ok(Json(iteration))
}

pub async fn release_validation(
    State(db): State<Database>,
    Path((id, number)): Path<(Uuid, u32)>,
) -> ApiResult<Json<ReleaseValidation>> {
    let stored = db
        .get_project(id)
        .map_err(internal_error)?
        .ok_or_else(project_not_found)?;
    stored
        .project
        .release_validation(number)
        .map(Json)
        .map_err(|e| governance_error(&e))
}

pub async fn approve_release(
    State(db): State<Database>,
    Path((id, number)): Path<(Uuid, u32)>,
) -> ApiResult<Json<Iteration>> {
    let (stored, _) = update(&db, id, |project| project.approve_release(number))?;
    stored
        .project
        .iteration(number)
        .cloned()
        .map(Json)
        .ok_or_else(|| governance_error(&GovernanceError::IterationNotFound(number)))
}
