//! Off-chain metadata document construction.
//!
//! Wallets and explorers resolve the on-chain metadata account's `uri`
//! field to this JSON document. The layout follows the fungible-token
//! convention: top-level name/symbol/description/image, display attributes,
//! and a `properties` block describing the image file and the creator.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;

/// A display attribute attached to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Parse the `attributes` form field, a JSON array of trait rows.
pub fn parse_attributes(raw: &str) -> Result<Vec<TokenAttribute>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Build the metadata document for a token.
pub fn metadata_document(
    name: &str,
    symbol: &str,
    description: &str,
    attributes: &[TokenAttribute],
    image_uri: &str,
    image_type: &str,
    creator: &Pubkey,
) -> Value {
    json!({
        "name": name,
        "symbol": symbol,
        "description": description,
        "image": image_uri,
        "attributes": attributes,
        "properties": {
            "files": [
                {
                    "uri": image_uri,
                    "type": image_type,
                }
            ],
            "category": "image",
            "creators": [
                {
                    "address": creator.to_string(),
                    "share": 100,
                }
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trait_rows() {
        let attributes =
            parse_attributes(r#"[{"trait_type":"Rarity","value":"Common"}]"#).unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].trait_type, "Rarity");
        assert_eq!(attributes[0].value, "Common");
    }

    #[test]
    fn rejects_non_array_attributes() {
        assert!(parse_attributes("not json").is_err());
        assert!(parse_attributes(r#"{"trait_type":"Rarity"}"#).is_err());
        assert!(parse_attributes(r#"[{"value":"Common"}]"#).is_err());
    }

    #[test]
    fn empty_array_parses() {
        assert!(parse_attributes("[]").unwrap().is_empty());
    }

    #[test]
    fn document_carries_image_and_creator() {
        let creator = Pubkey::new_unique();
        let attributes = vec![TokenAttribute {
            trait_type: "Rarity".to_string(),
            value: "Common".to_string(),
        }];

        let document = metadata_document(
            "Test Token",
            "TST",
            "A token for testing",
            &attributes,
            "https://gateway.test/img123",
            "image/png",
            &creator,
        );

        assert_eq!(document["name"], "Test Token");
        assert_eq!(document["symbol"], "TST");
        assert_eq!(document["description"], "A token for testing");
        assert_eq!(document["image"], "https://gateway.test/img123");
        assert_eq!(document["attributes"][0]["trait_type"], "Rarity");
        assert_eq!(document["properties"]["category"], "image");
        assert_eq!(document["properties"]["files"][0]["uri"], "https://gateway.test/img123");
        assert_eq!(document["properties"]["files"][0]["type"], "image/png");
        assert_eq!(document["properties"]["creators"][0]["address"], creator.to_string());
        assert_eq!(document["properties"]["creators"][0]["share"], 100);
    }
}
