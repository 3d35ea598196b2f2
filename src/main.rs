// region:    --- Imports
use auction_saga::bootstrap;
use auction_saga::config::Config;
use tracing::error;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), bootstrap::BoxError> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 인자/환경 변수 읽기 (잘못된 값이면 사용법 출력 후 종료)
    let config = Config::load();

    // 서버 실행
    if let Err(err) = bootstrap::run(config).await {
        error!("{:<12} --> Server error: {}", "Main", err);
        return Err(err);
    }
    Ok(())
}
// endregion: --- Main
