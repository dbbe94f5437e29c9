mod common;

#[tokio::test]
async fn test_index_served_at_root() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("<title>Snaplink</title>"));
}

#[tokio::test]
async fn test_assets_served() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    server.get("/index.html").await.assert_status_ok();
    server.get("/style.css").await.assert_status_ok();

    let script = server.get("/script.js").await;
    script.assert_status_ok();
    assert!(script.text().contains("/api/create"));

    server.get("/static/style.css").await.assert_status_ok();
}
