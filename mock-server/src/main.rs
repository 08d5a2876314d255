use mock_server::ReplicaIdentity;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let replica_id = std::env::var("REPLICA_ID").unwrap_or_else(|_| "replica-1".to_string());
    let upstream_server =
        std::env::var("UPSTREAM_SERVER").unwrap_or_else(|_| format!("127.0.0.1:{port}"));
    let identity = ReplicaIdentity {
        replica_id: Some(replica_id),
        upstream_server: Some(upstream_server),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run_with_identity(listener, identity).await
}
