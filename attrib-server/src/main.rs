use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;

use attrib_core::io::list_files;
use attrib_core::model::attribution::attribute;
use attrib_core::model::markov::Markov;

/// Directory holding the reference text files (`.txt`).
const DATA_DIR: &str = "./data";

/// Struct representing query parameters for the `/v1/load_models` endpoint
#[derive(Deserialize)]
struct LoadParams {
	a: Option<String>,
	b: Option<String>,
	order: Option<usize>,
}

/// Struct representing query parameters for the `/v1/attribute` endpoint
#[derive(Deserialize)]
struct AttributeParams {
	text: String,
}

/// One loaded reference model together with the name it was loaded under.
struct LoadedModel {
	name: String,
	model: Markov,
}

struct SharedData {
	model_a: Option<LoadedModel>,
	model_b: Option<LoadedModel>,
}

/// HTTP GET endpoint `/v1/attribute`
///
/// Scores the query text under both loaded reference models and returns
/// the two normalized log-likelihoods and the verdict as plain text.
#[get("/v1/attribute")]
async fn get_attribution(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<AttributeParams>,
) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let (model_a, model_b) = match (&shared_data.model_a, &shared_data.model_b) {
		(Some(a), Some(b)) => (a, b),
		_ => return HttpResponse::BadRequest().body("Load speaker models first (PUT /v1/load_models)"),
	};

	match attribute(&model_a.model, &model_b.model, &query.text) {
		Ok(res) => HttpResponse::Ok().body(format!(
			"Speaker A: {}\nSpeaker B: {}\n\nConclusion: Speaker {} is most likely",
			res.score_a, res.score_b, res.verdict
		)),
		Err(e) => HttpResponse::BadRequest().body(e),
	}
}

#[get("/v1/models")]
async fn get_models() -> impl Responder {
	match list_files(DATA_DIR, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let describe = |slot: &Option<LoadedModel>| match slot {
		Some(loaded) => format!("{} (order {})", loaded.name, loaded.model.order()),
		None => "<none>".to_owned(),
	};

	HttpResponse::Ok().body(format!(
		"A: {}\nB: {}",
		describe(&shared_data.model_a),
		describe(&shared_data.model_b)
	))
}

/// HTTP PUT endpoint `/v1/load_models`
///
/// Builds (or cache-loads) the two reference models from `./data`.
/// Both `a` and `b` are required; `order` defaults to 2.
#[put("/v1/load_models")]
async fn put_models(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<LoadParams>,
) -> impl Responder {
	let order = query.order.unwrap_or(2);

	let (name_a, name_b) = match (&query.a, &query.b) {
		(Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => (a.trim(), b.trim()),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let load = |name: &str| -> Result<LoadedModel, String> {
		let model_path = format!("{DATA_DIR}/{name}.txt");
		let model = Markov::from_file(&model_path, order)
			.map_err(|e| format!("Failed to load model '{name}': {e}"))?;
		Ok(LoadedModel { name: name.to_owned(), model })
	};

	let model_a = match load(name_a) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};
	let model_b = match load(name_b) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model_a = Some(model_a);
	shared_data.model_b = Some(model_b);

	HttpResponse::Ok().body("Models loaded successfully")
}

/// Main entry point for the server.
///
/// Wraps the two optional reference models in a `Mutex` for thread
/// safety and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Reference texts are read from `./data/<name>.txt`; trained models
///   are cached next to them by `Markov::from_file`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let shared_data = SharedData {
		model_a: None,
		model_b: None,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	log::info!("Listening on 127.0.0.1:5000");

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.service(get_attribution)
			.service(get_models)
			.service(put_models)
			.service(get_loaded_models)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
