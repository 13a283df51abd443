use actix_web::{test, web, App, HttpRequest, HttpResponse};
use bid_trace::{
    http_injector::{
        extract_trace_context, inject_trace_context, X_CURR_TID, X_ENTRY_TID, X_PREV_TID,
    },
    middleware::actix::TraceLayer,
    TraceCarrier, TraceContext,
};

/// Answers with the context bound to the request in the response headers.
async fn echo(request: HttpRequest) -> HttpResponse {
    let context = request.must_trace_context();
    let mut response = HttpResponse::Ok().finish();
    inject_trace_context(&context, response.headers_mut());
    response
}

async fn hop(pairs: &[(&'static str, &'static str)]) -> TraceContext {
    let app = test::init_service(App::new().wrap(TraceLayer).route("/", web::get().to(echo))).await;

    let mut request = test::TestRequest::get().uri("/");
    for pair in pairs {
        request = request.insert_header(*pair);
    }
    let response = test::call_service(&app, request.to_request()).await;
    assert!(response.status().is_success());

    extract_trace_context(response.headers())
}

#[actix_web::test]
async fn request_without_headers_starts_a_lineage() {
    let context = hop(&[]).await;

    assert!(context.is_origin());
    assert_eq!(context.entry_id(), context.current_id());
}

#[actix_web::test]
async fn request_from_origin_is_chained() {
    let context = hop(&[(X_CURR_TID, "A"), (X_ENTRY_TID, "A")]).await;

    assert_eq!(context.entry_id(), "A");
    assert_eq!(context.previous_id(), "A");
    assert_ne!(context.current_id(), "A");
}

#[actix_web::test]
async fn request_without_current_starts_a_lineage() {
    let context = hop(&[(X_CURR_TID, ""), (X_PREV_TID, "P"), (X_ENTRY_TID, "E")]).await;

    assert!(context.is_origin());
    assert_ne!(context.entry_id(), "E");
}

#[actix_web::test]
async fn handler_reads_context_bound_by_middleware() {
    let app = test::init_service(App::new().wrap(TraceLayer).route(
        "/",
        web::get().to(|request: HttpRequest| async move {
            match request.trace_context() {
                Some(context) if context.previous_id() == "C" => HttpResponse::Ok().finish(),
                _ => HttpResponse::InternalServerError().finish(),
            }
        }),
    ))
    .await;

    let request = test::TestRequest::get()
        .uri("/")
        .insert_header((X_CURR_TID, "C"))
        .insert_header((X_ENTRY_TID, "E"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert!(response.status().is_success());
}
