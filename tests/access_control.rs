use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use tower::util::ServiceExt;
use uuid::Uuid;

use fleetgate::create_app;
use fleetgate::utils::hash_password;

async fn setup() -> Result<(Router, SqlitePool, TempDir, PathBuf)> {
    let dir = tempdir().context("failed to create tempdir")?;
    let db_path = dir.path().join("test.db");

    use sqlx::sqlite::SqliteConnectOptions;
    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    )
    .await?;
    migrator.run(&pool).await?;

    std::env::set_var("JWT_SECRET", "test-secret");
    let audit_log = dir.path().join("audit.log");
    let app = create_app(pool.clone(), audit_log.clone()).await?;

    Ok((app, pool, dir, audit_log))
}

async fn seed_user(pool: &SqlitePool, login: &str, role: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let hash = hash_password("password123")?;
    let now = chrono::Utc::now();
    sqlx::query(
        "INSERT INTO users (id, name, login, role, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(login)
    .bind(login)
    .bind(role)
    .bind(hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn login_token(app: &Router, login: &str) -> Result<String> {
    let payload = json!({ "login": login, "password": "password123" });
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    let resp: Response = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK, "login failed for {login}");
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let v: Value = serde_json::from_slice(&bytes)?;
    Ok(v["token"].as_str().context("token missing")?.to_string())
}

async fn send(app: &Router, method: &str, uri: &str, token: &str, body: Option<Value>) -> Result<Response> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    Ok(app.clone().oneshot(builder.body(body)?).await?)
}

fn bus_payload(numero: &str) -> Value {
    json!({
        "numero": numero,
        "etat_vehicule": "BON",
        "kilometrage": 1000,
        "nombre_places": 30
    })
}

#[tokio::test]
async fn full_access_roles_can_manage_the_fleet() -> Result<()> {
    let (app, pool, _dir, _log) = setup().await?;
    seed_user(&pool, "admin", "ADMIN").await?;
    seed_user(&pool, "resp", "RESPONSABLE").await?;

    let admin = login_token(&app, "admin").await?;
    let resp_token = login_token(&app, "resp").await?;

    let r = send(&app, "POST", "/buses", &admin, Some(bus_payload("AED-01"))).await?;
    assert_eq!(r.status(), StatusCode::CREATED);

    let r = send(&app, "POST", "/buses", &resp_token, Some(bus_payload("AED-02"))).await?;
    assert_eq!(r.status(), StatusCode::CREATED);

    // Duplicate fleet number
    let r = send(&app, "POST", "/buses", &admin, Some(bus_payload("AED-01"))).await?;
    assert_eq!(r.status(), StatusCode::CONFLICT);

    let r = send(&app, "GET", "/buses", &admin, None).await?;
    assert_eq!(r.status(), StatusCode::OK);
    let bytes = body::to_bytes(r.into_body(), 10_485_760).await?;
    let buses: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(buses.as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn superviseur_reads_but_never_writes() -> Result<()> {
    let (app, pool, _dir, _log) = setup().await?;
    seed_user(&pool, "sup", "SUPERVISEUR").await?;
    let token = login_token(&app, "sup").await?;

    let r = send(&app, "GET", "/buses", &token, None).await?;
    assert_eq!(r.status(), StatusCode::OK);

    let r = send(&app, "GET", "/trips", &token, None).await?;
    assert_eq!(r.status(), StatusCode::OK);

    let r = send(&app, "POST", "/buses", &token, Some(bus_payload("AED-03"))).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);
    let bytes = body::to_bytes(r.into_body(), 10_485_760).await?;
    let err: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(err["error"], "forbidden");
    assert_eq!(err["message"], "Access denied");

    let trip = json!({
        "point_depart": "Campus",
        "point_arrivee": "Ville",
        "date_depart": "2025-09-01T08:00:00Z"
    });
    let r = send(&app, "POST", "/trips", &token, Some(trip)).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    let r = send(&app, "DELETE", &format!("/buses/{}", Uuid::new_v4()), &token, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn business_roles_are_walled_off_from_admin_surfaces() -> Result<()> {
    let (app, pool, _dir, _log) = setup().await?;
    let chauffeur_id = seed_user(&pool, "driver", "CHAUFFEUR").await?;
    seed_user(&pool, "charge", "CHARGE").await?;
    seed_user(&pool, "meca", "MECANICIEN").await?;

    let driver = login_token(&app, "driver").await?;
    let charge = login_token(&app, "charge").await?;
    let meca = login_token(&app, "meca").await?;

    // CHAUFFEUR: own trips yes, fleet listing no, admin surfaces no.
    let r = send(&app, "GET", "/my/trips", &driver, None).await?;
    assert_eq!(r.status(), StatusCode::OK);
    let r = send(&app, "GET", "/buses", &driver, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);
    let r = send(&app, "GET", "/admin/audit/logs", &driver, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);
    let r = send(&app, "GET", "/admin/users", &driver, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    // CHARGE plans trips but is not a driver.
    let trip = json!({
        "point_depart": "Campus",
        "point_arrivee": "Ville",
        "date_depart": "2025-09-01T08:00:00Z",
        "chauffeur_id": chauffeur_id
    });
    let r = send(&app, "POST", "/trips", &charge, Some(trip)).await?;
    assert_eq!(r.status(), StatusCode::CREATED);
    let r = send(&app, "GET", "/my/trips", &charge, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    // MECANICIEN can consult the shared trip board, nothing else here.
    let r = send(&app, "GET", "/trips", &meca, None).await?;
    assert_eq!(r.status(), StatusCode::OK);
    let r = send(&app, "GET", "/my/trips", &meca, None).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    // The driver sees the trip planned for them.
    let r = send(&app, "GET", "/my/trips", &driver, None).await?;
    let bytes = body::to_bytes(r.into_body(), 10_485_760).await?;
    let trips: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(trips.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn denied_requests_leave_no_audit_trace() -> Result<()> {
    let (app, pool, _dir, audit_log) = setup().await?;
    seed_user(&pool, "driver", "CHAUFFEUR").await?;
    let token = login_token(&app, "driver").await?;

    for _ in 0..3 {
        let r = send(&app, "GET", "/buses", &token, None).await?;
        assert_eq!(r.status(), StatusCode::FORBIDDEN);
    }
    let r = send(&app, "POST", "/buses", &token, Some(bus_payload("AED-09"))).await?;
    assert_eq!(r.status(), StatusCode::FORBIDDEN);

    let content = std::fs::read_to_string(&audit_log).unwrap_or_default();
    assert!(content.is_empty(), "denials must not be audited, got: {content}");

    Ok(())
}
