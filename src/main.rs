use anyhow::Context;
use cart_sync::core::{ConfigProvider, StockGateway};
use cart_sync::utils::{logger, validation::Validate};
use cart_sync::{
    Cart, CartCommand, CartError, CartStore, CliConfig, ConsoleNotifier, HttpStockGateway,
    LocalStorage, TomlConfig,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 有指定 TOML 檔時以檔案設定為主
    let toml_config = match &cli.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?,
        ),
        None => None,
    };

    let verbose = cli.verbose || toml_config.as_ref().is_some_and(TomlConfig::verbose);
    let json_logs = cli.json_logs || toml_config.as_ref().is_some_and(TomlConfig::json_logs);

    // 初始化日誌
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting cart CLI");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let succeeded = match &toml_config {
        Some(config) => run(config, &cli.command).await,
        None => run(&cli, &cli.command).await,
    };

    match succeeded {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }
}

/// Executes one command. `Ok(false)` means the cart operation was rejected.
async fn run<C: ConfigProvider + Validate>(
    config: &C,
    command: &CartCommand,
) -> Result<bool, CartError> {
    // 驗證配置
    config.validate()?;

    let gateway = HttpStockGateway::from_config(config)?;

    if let CartCommand::Products = command {
        let products = gateway.list_products().await?;
        for product in products {
            println!("#{:<4} {:>10.2}  {}", product.id, product.price, product.title);
        }
        return Ok(true);
    }

    let storage = LocalStorage::new(config.storage_dir().to_string());
    let store = CartStore::open(gateway, storage, config.storage_key(), ConsoleNotifier).await;

    let outcome = match command {
        CartCommand::Add { product_id } => store.add_item(*product_id).await,
        CartCommand::Remove { product_id } => store.remove_item(*product_id).await,
        CartCommand::Set { product_id, amount } => store.set_amount(*product_id, *amount).await,
        CartCommand::Show | CartCommand::Products => Ok(()),
    };

    print_cart(&store.snapshot().await);
    Ok(outcome.is_ok())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    for line in cart.iter() {
        println!(
            "#{:<4} {:>3} x {:>10.2} = {:>10.2}  {}",
            line.product_id,
            line.amount,
            line.price,
            line.subtotal(),
            line.title
        );
    }
    println!("{} items, total {:.2}", cart.item_count(), cart.subtotal());
}
