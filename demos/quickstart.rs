use bson::Bson;
use isodate::{BsonCodec, IsoDate, JsonCodec, Parser, TextCodec};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), isodate::IsoDateError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let parser = Parser::new();
    for token in [
        "now",
        "2017-09-20T14:37:53.000+0300",
        "2017-09-21T17:55:12.222Z",
        "2017-09-20T14:37:53.123456789+0300",
        "1505907473000",
        "",
    ] {
        let (date, how) = parser.resolve(token)?;
        println!("{token:>36} -> {date} ({how})");
    }

    let date = IsoDate::from_unix(1_505_907_473, 0);
    println!("JSON: {}", JsonCodec::new().encode(&date)?);
    println!(
        "text: {}",
        String::from_utf8_lossy(&TextCodec::new().encode(&date)?)
    );
    println!("BSON: {}", BsonCodec::new().encode(&date));

    println!("JSON \"\" -> {:?}", JsonCodec::new().decode(&json!(""))?);
    println!("text \"\" -> {}", TextCodec::new().decode(b"")?);
    println!(
        "BSON int64 -> {}",
        BsonCodec::new().decode(&Bson::Int64(1_505_907_473_000))?
    );
    Ok(())
}
