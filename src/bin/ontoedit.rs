#[tokio::main(flavor = "current_thread")]
async fn main() -> ontoedit::Result<()> {
    ontoedit::cli::main().await
}
