use std::sync::Arc;

use gcb_core::{chat::GroupChat, config::Config, users::PsqlUserDirectory};
use gcb_sofa::SofaClient;
use gcb_store::PsqlStore;

#[tokio::main]
async fn main() -> Result<(), gcb_core::Error> {
    gcb_core::logging::init("gcb")?;

    let cfg = Arc::new(Config::load()?);

    let store = PsqlStore::connect(&cfg.database_url, &cfg.stage)?;
    let users = PsqlUserDirectory::new(store.clone());
    users.initialize().await?;

    println!("gcb started: stage={}", cfg.stage);
    if let Some(address) = &cfg.bot_address {
        println!("Bot address: {address}");
    }

    let (client, outbound) = SofaClient::channel(64);
    let chat = Arc::new(GroupChat::new(
        Arc::new(users),
        Arc::new(client),
        cfg.bot_address.clone(),
    ));

    gcb_sofa::router::run(&cfg.chat_service_url, chat, outbound)
        .await
        .map_err(|e| gcb_core::Error::Messaging(format!("chat service loop failed: {e}")))?;

    store.close().await;
    Ok(())
}
