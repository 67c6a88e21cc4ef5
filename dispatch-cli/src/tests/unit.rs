//! Focused unit tests covering CLI configuration and command execution.

use super::helpers::{
    DUPLICATE_VEHICLES_JSON, INVALID_ORDERS_JSON, ORDERS_JSON, VEHICLES_JSON, Workspace,
    stored_order_ids, stored_snapshot,
};
use super::*;
use crate::ingest::{IngestConfig, IngestReceipt, config_from_layers_for_test, run_ingest_with};
use crate::plan::{PlanConfig, run_plan_with};
use camino::Utf8PathBuf;
use dispatch_core::DispatchPlan;
use dispatch_core::ingest::IngestError;
use ortho_config::MergeComposer;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn ingest_args(
    orders: Option<Utf8PathBuf>,
    vehicles: Option<Utf8PathBuf>,
    db: &Utf8PathBuf,
) -> IngestArgs {
    IngestArgs {
        orders,
        vehicles,
        db: Some(db.clone()),
    }
}

fn ingest(args: IngestArgs) -> Result<IngestReceipt, CliError> {
    let mut buffer = Vec::new();
    run_ingest_with(args, &mut buffer)?;
    let stdout = String::from_utf8(buffer).expect("stdout utf-8");
    Ok(serde_json::from_str(stdout.trim()).expect("receipt JSON"))
}

#[rstest]
fn converting_ingest_without_batches_errors() {
    let err = IngestConfig::try_from(IngestArgs::default()).expect_err("nothing to ingest");
    match err {
        CliError::NothingToIngest {
            orders_env,
            vehicles_env,
            ..
        } => {
            assert_eq!(orders_env, ENV_INGEST_ORDERS);
            assert_eq!(vehicles_env, ENV_INGEST_VEHICLES);
        }
        other => panic!("expected NothingToIngest, found {other:?}"),
    }
}

#[rstest]
fn ingest_config_defaults_database_path() {
    let args = IngestArgs {
        orders: Some(Utf8PathBuf::from("orders.json")),
        ..IngestArgs::default()
    };
    let config = IngestConfig::try_from(args).expect("config should build");
    assert_eq!(config.db, Utf8PathBuf::from(DEFAULT_DB));
    assert_eq!(config.vehicles, None);
}

#[rstest]
fn plan_config_defaults_database_path() {
    let config = PlanConfig::from(PlanArgs::default());
    assert_eq!(config.db, Utf8PathBuf::from(DEFAULT_DB));
}

#[rstest]
fn validate_sources_reports_missing_batch_files(workspace: Workspace) {
    let config = IngestConfig {
        orders: Some(workspace.path("missing-orders.json")),
        vehicles: None,
        db: workspace.db(),
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_ORDERS),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories(workspace: Workspace) {
    let orders = workspace.write("orders.json", ORDERS_JSON);
    let config = IngestConfig {
        orders: Some(orders),
        vehicles: Some(workspace.path("")),
        db: workspace.db(),
    };
    match config.validate_sources().expect_err("expected directory rejection") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_VEHICLES),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "orders": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence(workspace: Workspace) {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "orders": workspace.path("file-orders.json").as_str(),
            "db": workspace.path("file.db").as_str(),
        }),
        None,
    );
    composer.push_environment(json!({
        "orders": workspace.path("env-orders.json").as_str(),
        "db": workspace.path("env.db").as_str(),
    }));
    composer.push_cli(json!({
        "db": workspace.path("cli.db").as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.orders, Some(workspace.path("env-orders.json")));
    assert_eq!(config.vehicles, None);
    assert_eq!(config.db, workspace.path("cli.db"));
}

#[rstest]
fn ingest_persists_batches_and_prints_receipt(workspace: Workspace) {
    let orders = workspace.write("orders.json", ORDERS_JSON);
    let vehicles = workspace.write("vehicles.json", VEHICLES_JSON);
    let db = workspace.path("nested/dispatch.db");

    let receipt = ingest(ingest_args(Some(orders), Some(vehicles), &db)).expect("ingest");
    assert_eq!(
        receipt,
        IngestReceipt {
            status: "success".into(),
            message: "Delivery orders and vehicle details accepted.".into(),
            orders_accepted: 3,
            vehicles_accepted: 2,
        }
    );

    let snapshot = stored_snapshot(&db);
    assert_eq!(stored_order_ids(&db), vec!["ORD001", "ORD002", "ORD003"]);
    let vehicle_ids: Vec<String> = snapshot.vehicles.into_iter().map(|v| v.id).collect();
    assert_eq!(vehicle_ids, vec!["VEH002", "VEH001"]);
}

#[rstest]
fn reingesting_an_order_replaces_it_in_place(workspace: Workspace) {
    let db = workspace.db();
    let orders = workspace.write("orders.json", ORDERS_JSON);
    ingest(ingest_args(Some(orders), None, &db)).expect("first ingest");

    let update = workspace.write(
        "update.json",
        r#"{"orders": [{"orderId": "ORD001", "latitude": 1.0, "longitude": 2.0,
            "address": "Moved", "packageWeight": 5, "priority": "LOW"}]}"#,
    );
    let receipt = ingest(ingest_args(Some(update), None, &db)).expect("second ingest");
    assert_eq!(receipt.message, "Delivery orders accepted.");
    assert_eq!(receipt.orders_accepted, 1);

    let snapshot = stored_snapshot(&db);
    assert_eq!(stored_order_ids(&db), vec!["ORD001", "ORD002", "ORD003"]);
    let first = snapshot.orders.first().expect("first order");
    assert_eq!(first.address, "Moved");
    assert_eq!(first.package_weight, 5.0);
}

#[rstest]
fn invalid_orders_batch_reports_details_and_writes_nothing(workspace: Workspace) {
    let orders = workspace.write("orders.json", INVALID_ORDERS_JSON);
    let vehicles = workspace.write("vehicles.json", VEHICLES_JSON);
    let db = workspace.db();

    let err = ingest(ingest_args(Some(orders), Some(vehicles), &db)).expect_err("rejected");
    match &err {
        CliError::InvalidBatch {
            field,
            source: IngestError::Validation { .. },
            ..
        } => assert_eq!(*field, ARG_ORDERS),
        other => panic!("expected InvalidBatch, found {other:?}"),
    }
    assert_eq!(
        err.details(),
        vec![
            "orders[0].orderId: orderId is required",
            "orders[0].packageWeight: packageWeight must be positive",
        ]
    );
    assert!(!db.exists(), "rejected ingest must not create the database");
}

#[rstest]
fn duplicate_vehicles_are_rejected_without_details(workspace: Workspace) {
    let vehicles = workspace.write("vehicles.json", DUPLICATE_VEHICLES_JSON);
    let err = ingest(ingest_args(None, Some(vehicles), &workspace.db())).expect_err("rejected");
    match &err {
        CliError::InvalidBatch {
            source: IngestError::DuplicateVehicleId { id },
            ..
        } => assert_eq!(id, "VEH001"),
        other => panic!("expected duplicate vehicle error, found {other:?}"),
    }
    assert!(err.details().is_empty());
}

#[rstest]
fn malformed_json_is_a_parse_error(workspace: Workspace) {
    let orders = workspace.write("orders.json", "{ not json");
    let err = ingest(ingest_args(Some(orders), None, &workspace.db())).expect_err("rejected");
    match err {
        CliError::ParseBatch { field, .. } => assert_eq!(field, ARG_ORDERS),
        other => panic!("expected ParseBatch, found {other:?}"),
    }
}

#[rstest]
fn plan_requires_an_existing_database(workspace: Workspace) {
    let args = PlanArgs {
        db: Some(workspace.db()),
    };
    let mut buffer = Vec::new();
    match run_plan_with(args, &mut buffer).expect_err("missing database") {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_DB);
            assert_eq!(path, workspace.db());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(!workspace.db().exists(), "plan must not create the database");
}

#[rstest]
fn plan_prints_assignments_for_stored_records(workspace: Workspace) {
    let db = workspace.db();
    let orders = workspace.write("orders.json", ORDERS_JSON);
    let vehicles = workspace.write("vehicles.json", VEHICLES_JSON);
    ingest(ingest_args(Some(orders), Some(vehicles), &db)).expect("ingest");

    let mut buffer = Vec::new();
    run_plan_with(PlanArgs { db: Some(db) }, &mut buffer).expect("plan");
    let plan: DispatchPlan =
        serde_json::from_slice(&buffer).expect("output should be a JSON dispatch plan");

    let ids = |vehicle: &str| -> Vec<String> {
        plan.vehicle(vehicle)
            .expect("vehicle listed")
            .assigned_orders
            .iter()
            .map(|order| order.order_id.clone())
            .collect()
    };
    assert_eq!(ids("VEH001"), vec!["ORD001", "ORD003"]);
    assert_eq!(ids("VEH002"), vec!["ORD002"]);
    assert!(plan.unassigned_orders.is_empty());
    assert_eq!(plan.vehicle("VEH001").expect("VEH001").total_distance, "9.71 km");
    assert_eq!(plan.vehicle("VEH002").expect("VEH002").total_distance, "14.13 km");
}
