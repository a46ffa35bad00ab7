//! Chat Service
//!
//! Rule-based assistant replies. A message is lowercased and split on
//! non-alphanumeric characters; the first rule with a matching phrase wins.

use tracing::debug;

struct ChatRule {
    topic: &'static str,
    /// Each phrase is a run of whitespace-separated tokens that must appear
    /// consecutively in the message
    phrases: &'static [&'static str],
    reply: &'static str,
}

const RULES: &[ChatRule] = &[
    ChatRule {
        topic: "greeting",
        phrases: &["hi", "hello", "hey", "greetings"],
        reply: "Hello! I'm here to help you with your investment questions. What would you like to know?",
    },
    ChatRule {
        topic: "strategy",
        phrases: &["strategy", "strategies", "how to invest"],
        reply: "Common investment strategies:\n\n\
            1. Diversification: spread investments across assets, sectors and regions\n\
            2. Dollar-cost averaging: invest a fixed amount on a regular schedule\n\
            3. Long-term investing: hold for 5+ years to ride out volatility\n\
            4. Index fund investing: a low-cost way to match the market\n\
            5. Options strategies: covered calls and cash-secured puts for income\n\n\
            Would you like more detail on any of these?",
    },
    ChatRule {
        topic: "options",
        phrases: &[
            "options", "option", "call", "calls", "put", "puts", "strike", "premium", "greek",
            "greeks",
        ],
        reply: "Options overview:\n\n\
            - Calls: the right to buy at the strike price\n\
            - Puts: the right to sell at the strike price\n\
            - Covered calls: income from shares you already own\n\
            - Cash-secured puts: collect premium while waiting to buy lower\n\n\
            The options calculator shows Greeks, breakeven and payoff for a single leg.",
    },
    ChatRule {
        topic: "risk",
        phrases: &["risk", "risky", "safe", "conservative", "aggressive", "volatility"],
        reply: "Risk levels:\n\n\
            - Low: broad ETFs, index funds, blue-chip stocks\n\
            - Medium: individual stocks, sector ETFs\n\
            - High: options, leveraged funds, crypto\n\n\
            Never invest more than you can afford to lose, and match risk to your time horizon.",
    },
    ChatRule {
        topic: "market",
        phrases: &[
            "market", "nasdaq", "s p", "sp500", "dow", "trend", "analysis", "forecast",
        ],
        reply: "The market summary reports average YTD returns for NASDAQ, NYSE and S&P 500 \
            listings. Review historical prices for individual investments, and remember that \
            past performance does not guarantee future results.",
    },
    ChatRule {
        topic: "portfolio",
        phrases: &["portfolio", "diversify", "allocation", "balance", "holdings"],
        reply: "Balanced portfolio guidelines:\n\n\
            - Stocks: 60-80% depending on age and risk tolerance\n\
            - Bonds: 20-40%\n\
            - Cash: 3-6 months of expenses\n\n\
            Rebalance periodically and use the comparison tool to weigh candidates side by side.",
    },
    ChatRule {
        topic: "funds",
        phrases: &[
            "etf", "etfs", "index fund", "index funds", "passive", "expense ratio",
            "diversified",
        ],
        reply: "ETFs and index funds offer low expense ratios, instant diversification and \
            intraday liquidity. Popular choices include S&P 500 funds (VOO, SPY) and total \
            market funds (VTI).",
    },
    ChatRule {
        topic: "help",
        phrases: &["help", "what can you do", "capabilities", "features"],
        reply: "I can help with investment strategies, risk assessment, portfolio guidance, \
            options basics and finding your way around the watchlist, filters and comparison tool.",
    },
    ChatRule {
        topic: "calculator",
        phrases: &["calculator", "calculate", "profit", "loss", "p l"],
        reply: "The options calculator computes Delta, Gamma, Theta, Vega and Rho, along with \
            breakeven, maximum profit and loss and a payoff table across stock prices.",
    },
    ChatRule {
        topic: "comparison",
        phrases: &["compare", "comparison", "side by side", "which is better"],
        reply: "Add up to 4 investments to the comparison set to review YTD returns, dividend \
            yields, risk levels and recommendation scores side by side.",
    },
    ChatRule {
        topic: "watchlist",
        phrases: &["watchlist", "watch list", "favorite", "favorites", "save"],
        reply: "Use the star on any investment to add it to your watchlist. It is stored \
            locally and survives restarts until you log out.",
    },
    ChatRule {
        topic: "investing",
        phrases: &["invest", "buy", "sell", "trade", "stock", "share", "fund"],
        reply: "Before investing, define your goals, assess your time horizon and decide how \
            much risk you can take. Browse the recommendations and narrow them with filters.",
    },
    ChatRule {
        topic: "explain",
        phrases: &["what is", "explain", "tell me about", "define"],
        reply: "Happy to explain. Try a specific question such as 'what is a covered call' or \
            'tell me about index funds'.",
    },
    ChatRule {
        topic: "thanks",
        phrases: &["thank", "thanks", "appreciate", "grateful"],
        reply: "You're welcome! Ask anytime. Happy investing!",
    },
];

/// Reply used when no rule matches
pub const DEFAULT_REPLY: &str = "I'm designed to help with investment and trading questions. \
    Could you ask about strategies, options, risk, portfolios or the site's tools?";

pub struct ChatService;

impl ChatService {
    pub fn reply(message: &str) -> &'static str {
        let tokens = Self::tokenize(message);
        if tokens.is_empty() {
            return DEFAULT_REPLY;
        }

        for rule in RULES {
            if rule.phrases.iter().any(|p| Self::contains_phrase(&tokens, p)) {
                debug!("ChatService::reply - matched {}", rule.topic);
                return rule.reply;
            }
        }
        DEFAULT_REPLY
    }

    fn tokenize(message: &str) -> Vec<String> {
        message
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.is_empty() || words.len() > tokens.len() {
            return false;
        }
        tokens
            .windows(words.len())
            .any(|window| window.iter().zip(&words).all(|(t, w)| t == w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_of(reply: &str) -> &'static str {
        RULES
            .iter()
            .find(|r| r.reply == reply)
            .map(|r| r.topic)
            .unwrap_or("default")
    }

    #[test]
    fn test_keyword_topics() {
        assert_eq!(topic_of(ChatService::reply("Hello there")), "greeting");
        assert_eq!(topic_of(ChatService::reply("Which strategy suits me?")), "strategy");
        assert_eq!(topic_of(ChatService::reply("What are Greeks?")), "options");
        assert_eq!(topic_of(ChatService::reply("Is it RISKY")), "risk");
        assert_eq!(topic_of(ChatService::reply("how is the S&P doing")), "market");
        assert_eq!(topic_of(ChatService::reply("tell me about index funds")), "funds");
        assert_eq!(topic_of(ChatService::reply("how do I compare two")), "comparison");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // greeting precedes options
        assert_eq!(topic_of(ChatService::reply("hi, what is a put?")), "greeting");
    }

    #[test]
    fn test_tokens_match_whole_words() {
        // "this" contains "hi" but is not the token "hi"
        assert_eq!(ChatService::reply("this"), DEFAULT_REPLY);
        assert_eq!(ChatService::reply(""), DEFAULT_REPLY);
        assert_eq!(ChatService::reply("   ?!"), DEFAULT_REPLY);
    }
}
