mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[tokio::test]
async fn provinces_require_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/provinces", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn provinces_validate_field_lengths() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/provinces", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "code": "X".repeat(17),
            "name": "",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["code"], "Must be at most 16 characters");
    assert_eq!(body["field_errors"]["name"], "Must not be empty");

    Ok(())
}

#[tokio::test]
async fn provinces_crud_and_conflicts() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    let suffix = unique_suffix();
    let code = format!("T-{}", suffix);
    let name = format!("Testland {}", suffix);

    // Create
    let res = client
        .post(format!("{}/api/provinces", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"code": code, "name": name}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_i64().expect("province id");
    assert_eq!(created["code"], code.as_str());

    // Both fields colliding reports the combined conflict
    let res = client
        .post(format!("{}/api/provinces", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"code": code, "name": name}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Province code or name already exists");

    // Code-only collision
    let res = client
        .post(format!("{}/api/provinces", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"code": code, "name": format!("Otherland {}", suffix)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Province code already exists");

    // Name-only collision
    let res = client
        .post(format!("{}/api/provinces", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"code": format!("U-{}", &suffix[..6]), "name": name}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Province name already exists");

    // Show embeds cities
    let res = client
        .get(format!("{}/api/provinces/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let shown = res.json::<Value>().await?;
    assert_eq!(shown["id"], id);
    assert_eq!(shown["cities"], json!([]));

    // Partial update
    let renamed = format!("Testland Renamed {}", suffix);
    let res = client
        .put(format!("{}/api/provinces/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({"name": renamed}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["name"], renamed.as_str());
    assert_eq!(updated["code"], code.as_str());

    // Delete
    let res = client
        .delete(format!("{}/api/provinces/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/provinces/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn provinces_listing_embeds_cities_on_request() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    // Plain listing has no cities key
    let res = client
        .get(format!(
            "{}/api/provinces?filter=code eq ID-JK",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let plain = res.json::<Value>().await?;
    let rows = plain.as_array().expect("province array");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("cities").is_none());

    // withCities embeds the seeded Jakarta cities
    let res = client
        .get(format!(
            "{}/api/provinces?filter=code eq ID-JK&withCities=1",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let with_cities = res.json::<Value>().await?;
    let rows = with_cities.as_array().expect("province array");
    assert_eq!(rows.len(), 1);
    let cities = rows[0]["cities"].as_array().expect("cities array");
    assert!(cities.len() >= 5);
    assert!(cities.iter().any(|c| c["name"] == "Jakarta Pusat"));

    Ok(())
}

#[tokio::test]
async fn provinces_initiate_reports_listing_metadata() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/provinces/initiate?filter=code like ID-",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["params"]["page"], 1);
    assert_eq!(body["params"]["limit"], 10);
    assert_eq!(body["valid_order_by"], json!(["id", "code", "name"]));
    assert_eq!(body["valid_search_by"], json!(["code", "name"]));
    assert_eq!(body["valid_operator"]["id"]["operator"], json!(["eq", "not_eq"]));
    // Seed data carries at least the four ID-* provinces
    assert!(body["count_data"].as_i64().unwrap_or(0) >= 4);

    Ok(())
}
