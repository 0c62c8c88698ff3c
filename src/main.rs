#[tokio::main]
async fn main() {
    tenant_notes_backend::run().await
}
