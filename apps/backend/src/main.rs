use koikoi_backend::ai::{create_ai, SelfPlay};
use koikoi_backend::{EngineConfig, GameFlowService};
use tracing::{error, info};
use uuid::Uuid;

mod telemetry;

/// Upper bound on commands for one self-played match.
const MAX_COMMANDS: usize = 10_000;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid engine configuration");
            std::process::exit(1);
        }
    };
    let first_bot = std::env::var("KOIKOI_BOT_A").unwrap_or_else(|_| "greedy".to_string());
    let second_bot = std::env::var("KOIKOI_BOT_B").unwrap_or_else(|_| "random".to_string());
    let (Some(bot_a), Some(bot_b)) = (create_ai(&first_bot, None), create_ai(&second_bot, None))
    else {
        error!(%first_bot, %second_bot, "Unknown bot type; expected 'greedy' or 'random'");
        std::process::exit(1);
    };

    let service = GameFlowService::in_memory(config);
    let game_id = Uuid::new_v4().to_string();
    let subscription = service.subscribe(&game_id);
    let subscription_id = subscription.id;
    let mut receiver = subscription.receiver;
    let printer = tokio::spawn(async move {
        while let Some(envelope) = receiver.recv().await {
            match serde_json::to_string(&envelope) {
                Ok(json) => info!(seq = envelope.seq, event = envelope.event.name(), payload = %json, "Event"),
                Err(e) => error!(seq = envelope.seq, error = %e, "Event not serializable"),
            }
        }
    });

    info!(game_id = %game_id, %first_bot, %second_bot, "Starting self-play match");
    let result = SelfPlay::new(service.clone(), game_id.clone())
        .seat("bot-a", format!("Bot A ({first_bot})"), bot_a)
        .seat("bot-b", format!("Bot B ({second_bot})"), bot_b)
        .run(MAX_COMMANDS)
        .await;

    // Dropping the sender lets the printer drain what is queued and stop.
    service.hub().unsubscribe(&game_id, subscription_id);
    if let Err(e) = printer.await {
        error!(error = %e, "Event printer task failed");
    }

    match result {
        Ok(snapshot) => info!(
            game_id = %game_id,
            rounds_played = snapshot.rounds_played,
            winner_id = ?snapshot.winner_id,
            final_scores = ?snapshot.cumulative_scores,
            "Match finished"
        ),
        Err(e) => {
            error!(game_id = %game_id, code = %e.code(), error = %e, "Self-play failed");
            std::process::exit(1);
        }
    }
}
