use anyhow::Result;
use std::sync::Arc;
use label_courier::{
    config::Config,
    download::HttpDownloader,
    models::{Address, DistanceUnit, MassUnit, Parcel},
    shipment::ShipmentClient,
    workflow::LabelWorkflow,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let workflow = LabelWorkflow::new(
        Arc::new(ShipmentClient::new(config.clone())?),
        Arc::new(HttpDownloader::new()?),
        &config,
    );

    println!(
        "[{}] Purchasing label via {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        config.api_base_url
    );
    println!("================================");

    if let Err(e) = workflow
        .run(address_from(), address_to(), vec![sample_parcel()])
        .await
    {
        eprintln!("Error during label run: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn address_from() -> Address {
    Address {
        name: "Shawn Ippotle".to_string(),
        street1: "215 Clayton St.".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        zip: "94117".to_string(),
        country: "US".to_string(),
        phone: "+1 555 341 9393".to_string(),
        email: "test@gmail.com".to_string(),
    }
}

fn address_to() -> Address {
    Address {
        name: "Mr. Hippo".to_string(),
        street1: "1092 Indian Summer Ct".to_string(),
        city: "San Jose".to_string(),
        state: "CA".to_string(),
        zip: "95122".to_string(),
        country: "US".to_string(),
        phone: "+1 555 341 9393".to_string(),
        email: "test@gmail.com".to_string(),
    }
}

fn sample_parcel() -> Parcel {
    Parcel {
        length: "15".to_string(),
        width: "15".to_string(),
        height: "15".to_string(),
        distance_unit: DistanceUnit::Cm,
        weight: "0.2".to_string(),
        mass_unit: MassUnit::Kg,
    }
}
