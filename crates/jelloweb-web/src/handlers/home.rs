//! jello page — JSON / JSON Lines input, path query, highlighted output.

use axum::{extract::State, response::Html, Form};
use chrono::Utc;
use jelloweb_engine::{transform, Stage, VERSION};
use minijinja::{context, Value};
use tracing::{debug, info};

use crate::error::WebError;
use crate::flash::{Flash, LOAD_FAILED, QUERY_FAILED};
use crate::forms::{FieldErrors, QueryForm};
use crate::state::SharedState;
use crate::csrf;

pub const TITLE: &str = "jello web";

pub async fn home_page(State(state): State<SharedState>) -> Result<Html<String>, WebError> {
    render_home(&state, &QueryForm::default(), &FieldErrors::new(), &[], "")
}

pub async fn home_submit(
    State(state): State<SharedState>,
    Form(form): Form<QueryForm>,
) -> Result<Html<String>, WebError> {
    let errors = form.validate(&state.secret, state.csrf_time_limit(), Utc::now());
    if !errors.is_empty() {
        debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Query form failed validation");
        return render_home(&state, &form, &errors, &[], "");
    }

    let engine = state.engine.clone();
    let input = form.json_input.clone();
    let query = form.query_input.clone();
    let opts = form.options(&state.config.render);

    let result = tokio::task::spawn_blocking(move || {
        transform(engine.as_ref(), &input, &query, &opts)
    })
    .await?;

    match result {
        Ok(output) => {
            info!(
                engine = state.engine.name(),
                input_bytes = form.json_input.len(),
                schema = form.schema,
                "Query succeeded"
            );
            render_home(&state, &form, &errors, &[], &output)
        }
        Err(e) => {
            let lead = match e.stage {
                Stage::Load => LOAD_FAILED,
                Stage::Query => QUERY_FAILED,
            };
            info!(stage = ?e.stage, kind = e.source.kind(), "Query failed");
            let flashes = [Flash::exception(lead, &e.source)];
            render_home(&state, &form, &errors, &flashes, "")
        }
    }
}

fn render_home(
    state: &SharedState,
    form: &QueryForm,
    errors: &FieldErrors,
    flashes: &[Flash],
    output: &str,
) -> Result<Html<String>, WebError> {
    let csrf_token = csrf::issue(&state.secret, Utc::now())?;
    let html = state.templates.get_template("home.html")?.render(context! {
        title => TITLE,
        version => VERSION,
        form => form,
        errors => errors,
        flashes => flashes,
        csrf_token => csrf_token,
        output => Value::from_safe_string(output.to_string()),
    })?;
    Ok(Html(html))
}
