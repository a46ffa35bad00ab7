//! Options calculator and chat assistant commands

use crate::error::{AppError, Result};
use crate::services::{ChatService, OptionAnalysis, OptionInput, OptionsService};
use serde::{Deserialize, Serialize};

pub fn calculate_option(input: OptionInput) -> Result<OptionAnalysis> {
    OptionsService::analyze(&input)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub fn chat_reply(request: ChatRequest) -> Result<ChatReply> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is empty".to_string()));
    }
    Ok(ChatReply {
        reply: ChatService::reply(&request.message).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_option_from_json() {
        let input: OptionInput = serde_json::from_value(serde_json::json!({
            "stockPrice": 100.0,
            "strikePrice": 100.0,
            "premium": 3.0,
            "daysToExpiration": 45,
            "optionType": "put",
            "position": "buy"
        }))
        .unwrap();

        let analysis = calculate_option(input).unwrap();
        assert_eq!(analysis.breakeven, 97.0);
        assert_eq!(analysis.max_profit, Some(97.0));
        assert_eq!(analysis.max_loss, Some(3.0));
        assert!(analysis.greeks.delta < 0.0);
    }

    #[test]
    fn test_chat_reply() {
        let reply = chat_reply(ChatRequest {
            message: "hello".to_string(),
        })
        .unwrap();
        assert!(reply.reply.starts_with("Hello"));

        let empty = chat_reply(ChatRequest {
            message: "   ".to_string(),
        });
        assert!(matches!(empty, Err(AppError::Validation(_))));
    }
}
