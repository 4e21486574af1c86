//! AWS Lambda function serving the recipe catalog JSON API.

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    recipebox_lambda_api::run().await
}
