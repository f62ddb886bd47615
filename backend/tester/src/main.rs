use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use serde_json::{Value, json};

/// Sends one sample intake to a running server and prints the user's history.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[arg(long, default_value = "tester")]
    user_id: String,

    #[arg(long, default_value_t = 34)]
    age: u32,

    #[arg(long, default_value = "Male")]
    gender: String,

    #[arg(long, value_delimiter = ',', default_value = "fever,cough")]
    symptoms: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = Client::new();

    let payload = json!({
        "age": args.age,
        "gender": args.gender,
        "symptoms": args.symptoms,
        "userId": args.user_id,
    });

    let response = client
        .post(format!("{}/predict", args.server))
        .json(&payload)
        .send()
        .await?;

    println!("Status: {}", response.status());
    println!("{}\n", serde_json::to_string_pretty(&response.json::<Value>().await?)?);

    let history: Vec<Value> = client
        .get(format!("{}/predict", args.server))
        .query(&[("userId", &args.user_id)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!("History for {}: {} record(s)", args.user_id, history.len());
    for record in history {
        println!(
            "  {} {} -> {}",
            record["createdAt"].as_str().unwrap_or("?"),
            record["symptoms"],
            record["disease"].as_str().unwrap_or("none"),
        );
    }

    Ok(())
}
