//! Fixed user-facing replies for turns that end without model text

use crate::config::FallbackLanguage;

/// The four canned replies a turn can end with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMessages {
    /// The backend rejected the request
    pub unavailable: String,
    /// The model answered with empty text
    pub nothing_to_add: String,
    /// The iteration bound was reached
    pub finished: String,
    /// Anything else went wrong
    pub error: String,
}

impl FallbackMessages {
    pub fn english() -> Self {
        Self {
            unavailable: "Sorry, I can't process this request right now.".to_string(),
            nothing_to_add: "I have nothing to add to this conversation.".to_string(),
            finished: "I've finished processing your requests.".to_string(),
            error: "An error occurred while calling the AI.".to_string(),
        }
    }

    pub fn vietnamese() -> Self {
        Self {
            unavailable: "Xin lỗi, tôi không thể xử lý yêu cầu này lúc này.".to_string(),
            nothing_to_add: "Tôi không có gì để thêm vào cuộc trò chuyện này.".to_string(),
            finished: "Đã xử lý xong các yêu cầu của bạn.".to_string(),
            error: "Đã xảy ra lỗi khi gọi AI.".to_string(),
        }
    }

    pub fn for_language(language: FallbackLanguage) -> Self {
        match language {
            FallbackLanguage::En => Self::english(),
            FallbackLanguage::Vi => Self::vietnamese(),
        }
    }
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_are_complete_and_distinct() {
        for set in [FallbackMessages::english(), FallbackMessages::vietnamese()] {
            let all = [&set.unavailable, &set.nothing_to_add, &set.finished, &set.error];
            assert!(all.iter().all(|m| !m.trim().is_empty()));
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
        assert_eq!(FallbackMessages::for_language(FallbackLanguage::Vi), FallbackMessages::vietnamese());
        assert_eq!(FallbackMessages::default(), FallbackMessages::english());
    }
}
