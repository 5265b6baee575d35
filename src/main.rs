use atelier_backend::app::App;
use atelier_backend::util::logger::Logger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let _logger = Logger::new()?;

    let app = App::new().await?;
    app.start().await
}
