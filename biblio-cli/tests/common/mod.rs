//! In-process fake of the catalog REST server.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct Db {
    pub autores: Vec<Value>,
    pub editoriales: Vec<Value>,
    pub libros: Vec<Value>,
    /// Resources (or "informe") that answer 500.
    pub failing: HashSet<String>,
    /// Every request as "METHOD /path".
    pub requests: Vec<String>,
}

impl Db {
    pub fn seeded() -> Self {
        Self {
            autores: vec![
                json!({ "_id": "a1", "nombre": "Frank Herbert", "nacionalidad": "USA",
                        "fechaNacimiento": "1920-10-08T00:00:00.000Z" }),
                json!({ "_id": "a2", "nombre": "Isaac Asimov" }),
            ],
            editoriales: vec![json!({ "_id": "p1", "nombre": "Chilton", "anioFundacion": 1904 })],
            libros: vec![
                json!({ "_id": "b1", "titulo": "Dune", "anio": 1965, "disponible": true,
                        "autor": { "_id": "a1", "nombre": "Frank Herbert" }, "editorial": "p1" }),
                json!({ "_id": "b2", "titulo": "Dune Messiah", "disponible": false, "autor": "a1" }),
                json!({ "_id": "b3", "titulo": "Foundation", "categoria": "Ciencia ficción",
                        "disponible": true, "autor": "a2" }),
            ],
            ..Default::default()
        }
    }

    fn collection(&mut self, resource: &str) -> Option<&mut Vec<Value>> {
        match resource {
            "autores" => Some(&mut self.autores),
            "editoriales" => Some(&mut self.editoriales),
            "libros" => Some(&mut self.libros),
            _ => None,
        }
    }

    pub fn mutations(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| !r.starts_with("GET"))
            .count()
    }

    pub fn find(&self, resource: &str, id: &str) -> Option<Value> {
        let records = match resource {
            "autores" => &self.autores,
            "editoriales" => &self.editoriales,
            _ => &self.libros,
        };
        records.iter().find(|r| r["_id"] == id).cloned()
    }
}

pub type SharedDb = Arc<Mutex<Db>>;

type Reply = Result<Json<Value>, StatusCode>;

fn guard(db: &mut Db, request: String, resource: &str) -> Result<(), StatusCode> {
    db.requests.push(request);
    if db.failing.contains(resource) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

async fn list(State(db): State<SharedDb>, Path(resource): Path<String>) -> Reply {
    let mut db = db.lock().unwrap();
    guard(&mut db, format!("GET /{resource}"), &resource)?;
    let records = db.collection(&resource).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(Value::Array(records.clone())))
}

async fn create(
    State(db): State<SharedDb>,
    Path(resource): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut db = db.lock().unwrap();
    guard(&mut db, format!("POST /{resource}"), &resource)?;
    body["_id"] = json!(uuid::Uuid::new_v4().to_string());
    let records = db.collection(&resource).ok_or(StatusCode::NOT_FOUND)?;
    records.push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update(
    State(db): State<SharedDb>,
    Path((resource, id)): Path<(String, String)>,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut db = db.lock().unwrap();
    guard(&mut db, format!("PUT /{resource}/{id}"), &resource)?;
    let records = db.collection(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let record = records
        .iter_mut()
        .find(|r| r["_id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    body["_id"] = json!(id);
    *record = body.clone();
    Ok(Json(body))
}

async fn remove(
    State(db): State<SharedDb>,
    Path((resource, id)): Path<(String, String)>,
) -> StatusCode {
    let mut db = db.lock().unwrap();
    if let Err(status) = guard(&mut db, format!("DELETE /{resource}/{id}"), &resource) {
        return status;
    }
    let Some(records) = db.collection(&resource) else {
        return StatusCode::NOT_FOUND;
    };
    let before = records.len();
    records.retain(|r| r["_id"] != id.as_str());
    if records.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

fn search(db: &SharedDb, request: String, keep: impl Fn(&Value) -> bool) -> Reply {
    let mut db = db.lock().unwrap();
    guard(&mut db, request, "buscar")?;
    let hits = db.libros.iter().filter(|b| keep(b)).cloned().collect();
    Ok(Json(Value::Array(hits)))
}

fn contains(field: &Value, text: &str) -> bool {
    field
        .as_str()
        .is_some_and(|s| s.to_lowercase().contains(&text.to_lowercase()))
}

async fn by_title(State(db): State<SharedDb>, Path(text): Path<String>) -> Reply {
    search(&db, format!("GET /libros/buscar/titulo/{text}"), |b| {
        contains(&b["titulo"], &text)
    })
}

async fn by_category(State(db): State<SharedDb>, Path(text): Path<String>) -> Reply {
    search(&db, format!("GET /libros/buscar/categoria/{text}"), |b| {
        contains(&b["categoria"], &text)
    })
}

async fn by_availability(State(db): State<SharedDb>, Path(flag): Path<bool>) -> Reply {
    search(&db, format!("GET /libros/buscar/disponible/{flag}"), |b| {
        b["disponible"].as_bool().unwrap_or(true) == flag
    })
}

async fn report(State(db): State<SharedDb>) -> Result<impl IntoResponse, StatusCode> {
    let mut db = db.lock().unwrap();
    guard(&mut db, "GET /informe".to_string(), "informe")?;
    Ok((
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4 fake report".to_vec(),
    ))
}

pub fn build_router(db: SharedDb) -> Router {
    Router::new()
        .route("/api/informe", get(report))
        .route("/api/{resource}", get(list).post(create))
        .route("/api/{resource}/{id}", axum::routing::put(update).delete(remove))
        .route("/api/libros/buscar/titulo/{text}", get(by_title))
        .route("/api/libros/buscar/categoria/{text}", get(by_category))
        .route("/api/libros/buscar/disponible/{flag}", get(by_availability))
        .with_state(db)
}

/// Spin up the fake server on an OS-assigned port, returning its API URL.
pub async fn spawn_server(db: Db) -> (String, SharedDb) {
    let db = Arc::new(Mutex::new(db));
    let app = build_router(Arc::clone(&db));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{port}/api"), db)
}
