// Quick diagnostic: verify client credentials and, optionally, that a playlist is readable
// Run: cargo run --bin spotify_check [playlist-url]

#[path = "../src/config.rs"]
mod config;
#[path = "../src/resolve.rs"]
mod resolve;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("FAIL: {}", e);
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::new();

    // 1. Client-credentials token
    println!("1. Requesting client-credentials token...");
    let auth = BASE64_STANDARD.encode(format!("{}:{}", config.client_id, config.client_secret));
    let token_resp = match client
        .post("https://accounts.spotify.com/api/token")
        .header("Authorization", format!("Basic {}", auth))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            println!("   FAIL: token request failed: {}", e);
            std::process::exit(1);
        }
    };

    let token_status = token_resp.status();
    let token_body = token_resp.text().await.unwrap_or_default();
    if !token_status.is_success() {
        println!("   FAIL: Token request returned {}:\n{}", token_status, token_body);
        std::process::exit(1);
    }

    let token_json: serde_json::Value =
        serde_json::from_str(&token_body).unwrap_or(serde_json::json!({}));
    let Some(access_token) = token_json["access_token"].as_str() else {
        println!("   FAIL: no access_token in response: {}", token_body);
        std::process::exit(1);
    };
    println!(
        "   OK. Token expires in {}s",
        token_json["expires_in"].as_u64().unwrap_or(0)
    );

    // 2. Optional playlist read
    let Some(reference) = std::env::args().nth(1) else {
        println!("\nNo playlist given; skipping playlist check.");
        return;
    };
    let playlist_id = match resolve::parse_playlist_id(reference.trim()) {
        Ok(id) => id,
        Err(e) => {
            println!("\nFAIL: {} {:?}", e, reference);
            std::process::exit(1);
        }
    };

    println!("\n2. Getting playlist {} (GET /v1/playlists/...)...", playlist_id);
    let playlist_resp = match client
        .get(format!("https://api.spotify.com/v1/playlists/{}", playlist_id))
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            println!("   FAIL: playlist request failed: {}", e);
            std::process::exit(1);
        }
    };

    let playlist_status = playlist_resp.status();
    let playlist_body = playlist_resp.text().await.unwrap_or_default();
    if !playlist_status.is_success() {
        println!("   FAIL: {} - {}", playlist_status, playlist_body);
        println!("   (Client-credentials tokens can only read public playlists)");
        std::process::exit(1);
    }

    let p: serde_json::Value =
        serde_json::from_str(&playlist_body).unwrap_or(serde_json::json!({}));
    let total = p["items"]["total"]
        .as_u64()
        .or_else(|| p["tracks"]["total"].as_u64());
    println!("   OK. Playlist: \"{}\"", p["name"].as_str().unwrap_or("?"));
    println!(
        "       Owner: {} ({})",
        p["owner"]["display_name"].as_str().unwrap_or("?"),
        p["owner"]["id"].as_str().unwrap_or("?")
    );
    match total {
        Some(n) => println!("       Items: {}", n),
        None => println!("       Items: (not in response)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_same_references_as_main_binary() {
        assert_eq!(
            resolve::parse_playlist_id("https://open.spotify.com/user/x/playlist/-/playlist/abc123"),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn credentials_are_trimmed() {
        let config = Config::from_lookup(|key| match key {
            "SPOTIPY_CLIENT_ID" => Some("  id \n".to_string()),
            "SPOTIPY_CLIENT_SECRET" => Some("\tsecret ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
    }
}
