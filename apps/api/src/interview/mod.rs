// Interview dialogue: question bank, rubrics, scripts, the dialogue engine,
// and the session/speech layer that drives it over HTTP.
// The engine and evaluator are pure; only session and speech touch the runtime.

pub mod bank;
pub mod engine;
pub mod handlers;
pub mod rubric;
pub mod script;
pub mod session;
pub mod speech;
