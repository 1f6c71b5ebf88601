use tokio::net::TcpListener;

/// Serves the mock API on `HOST:PORT` (defaults `127.0.0.1:3000`).
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    println!("mock API listening on http://{}", listener.local_addr()?);
    mock_server::run(listener).await
}
