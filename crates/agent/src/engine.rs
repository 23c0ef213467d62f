//! The conversation engine: classification short-circuits, retrieval,
//! prompt assembly, and the bounded tool-calling loop.

use crate::classifier;
use crate::sessions::SessionStore;
use greenmow_core::{
    Language, Message, Provider, ProviderRequest, Result, SessionId, ToolCall, ToolRegistry,
};
use greenmow_kb::KnowledgeBase;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum model round-trips per turn. When the model is still asking for
/// tools after the last one, the turn ends with a canned reply.
const MAX_MODEL_CALLS: usize = 5;

/// One inbound chat turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub message: String,
    pub use_retrieval: bool,
    pub top_k: usize,
    pub session_id: Option<String>,
}

/// The outcome of a turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub reply: String,
    pub sources: Vec<String>,
    pub session_id: String,
    pub language: Language,
}

/// The conversation engine. One instance serves all sessions.
pub struct ChatEngine {
    provider: Arc<dyn Provider>,
    model: String,
    bot_name: String,
    tools: ToolRegistry,
    kb: Arc<KnowledgeBase>,
    sessions: SessionStore,
}

impl ChatEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        bot_name: impl Into<String>,
        tools: ToolRegistry,
        kb: Arc<KnowledgeBase>,
        max_sessions: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            bot_name: bot_name.into(),
            tools,
            kb,
            sessions: SessionStore::new(max_sessions),
        }
    }

    /// Run one conversation turn.
    pub async fn run_turn(&self, req: TurnRequest) -> Result<TurnResult> {
        let msg = req.message.clone();
        let sid = req
            .session_id
            .clone()
            .unwrap_or_else(|| SessionId::generate().0);

        // Explicit language requests override the session; otherwise the
        // session language sticks; a brand-new session gets detection.
        let lang = if let Some(forced) = classifier::explicit_lang_request(&msg) {
            self.sessions.set_language(&sid, forced).await;
            forced
        } else if let Some(existing) = self.sessions.language(&sid).await {
            existing
        } else {
            let detected = classifier::detect_lang(&msg);
            self.sessions.set_language(&sid, detected).await;
            detected
        };

        // Bare language name => confirm the switch, nothing else.
        if let Some(switched) = classifier::is_language_only(&msg) {
            self.sessions.set_language(&sid, switched).await;
            let reply = classifier::language_switch_reply(switched);
            return self.finish(&sid, reply.to_string(), Vec::new(), switched).await;
        }

        // Translation of the previous reply.
        if let Some(target) = classifier::wants_translation_to(&msg) {
            self.sessions.set_language(&sid, target).await;
            let Some(last) = self.sessions.last_reply(&sid).await else {
                let reply = classifier::translation_no_source_reply(target);
                return self.finish(&sid, reply.to_string(), Vec::new(), target).await;
            };
            debug!(session_id = %sid, target = %target, "translating previous reply");
            let translated = self.provider.translate(&self.model, &last, target).await?;
            return self.finish(&sid, translated, Vec::new(), target).await;
        }

        // Bare greeting => short canned reply in the session language.
        if classifier::is_greeting_only(&msg) {
            let reply = classifier::greeting_reply(lang);
            return self.finish(&sid, reply.to_string(), Vec::new(), lang).await;
        }

        // Retrieval.
        let retrieved = if req.use_retrieval {
            self.kb.retrieve(&msg, req.top_k).await?
        } else {
            Vec::new()
        };
        let sources: Vec<String> = retrieved.iter().map(|c| c.doc_id.clone()).collect();

        // Self-identification correction fires once per session.
        let correct_name =
            classifier::mentions_other_assistant(&msg) && self.sessions.claim_name_correction(&sid).await;

        let mut messages = vec![Message::system(self.system_prompt(lang, correct_name))];
        if !retrieved.is_empty() {
            let context_text = retrieved
                .iter()
                .enumerate()
                .map(|(i, c)| format!("[{}] SOURCE: {}\n{}", i + 1, c.doc_id, c.text))
                .collect::<Vec<_>>()
                .join("\n\n");
            messages.push(Message::system(format!("Kontext:\n{context_text}")));
        }
        messages.push(Message::user(&msg));

        // Tool-calling loop, bounded by model round-trips.
        let tool_defs = self.tools.definitions();
        for step in 1..=MAX_MODEL_CALLS {
            let response = self
                .provider
                .complete(ProviderRequest {
                    model: self.model.clone(),
                    messages: messages.clone(),
                    tools: tool_defs.clone(),
                })
                .await?;

            let assistant = response.message;
            if assistant.tool_calls.is_empty() {
                return self.finish(&sid, assistant.content, sources, lang).await;
            }

            debug!(
                session_id = %sid,
                step,
                tools = assistant.tool_calls.len(),
                "model requested tool calls"
            );
            messages.push(assistant.clone());

            for tc in &assistant.tool_calls {
                // Malformed argument JSON degrades to an empty object so
                // the tool can still report a useful validation error.
                let arguments: serde_json::Value = serde_json::from_str(&tc.arguments)
                    .unwrap_or_else(|_| serde_json::json!({}));

                let result = self
                    .tools
                    .dispatch(&ToolCall {
                        id: tc.id.clone(),
                        name: tc.name.clone(),
                        arguments,
                    })
                    .await;

                messages.push(Message::tool_result(
                    result.call_id.clone(),
                    result.payload.to_string(),
                ));
            }
        }

        warn!(session_id = %sid, "tool loop did not converge");
        let reply = classifier::loop_did_not_finish_reply(lang);
        self.finish(&sid, reply.to_string(), sources, lang).await
    }

    async fn finish(
        &self,
        sid: &str,
        reply: String,
        sources: Vec<String>,
        language: Language,
    ) -> Result<TurnResult> {
        self.sessions.set_last_reply(sid, &reply).await;
        info!(session_id = %sid, lang = %language, "turn complete");
        Ok(TurnResult {
            reply,
            sources,
            session_id: sid.to_string(),
            language,
        })
    }

    fn system_prompt(&self, lang: Language, correct_name: bool) -> String {
        let mut system = match lang {
            Language::En => format!(
                "You are {} (OrderBooking Bot). Reply in English ONLY.\n\
                 Never claim you are ChatGPT, GPT, Copilot, or any other assistant.\n\
                 Do NOT repeat your name in every reply.\n\
                 Use provided context as the primary source.\n\
                 If the answer is not in the context (and you cannot know), say you don't know.\n\
                 Do not invent facts. If details are not in the provided context or tool results, say you don’t have that information.\n\
                 Do not mix languages. If context is in another language, translate it internally but keep the answer in English.\n\
                 You may call tools to query/update the internal database if needed.\n\
                 When you use tool results, explain them clearly in English.\n",
                self.bot_name
            ),
            Language::De => format!(
                "Du bist {} (OrderBooking Bot). Antworte NUR auf Deutsch.\n\
                 Behaupte niemals, dass du ChatGPT, GPT, Copilot oder ein anderer Assistent bist.\n\
                 Nenne deinen Namen nicht in jeder Antwort.\n\
                 Wenn Kontext bereitgestellt wird, nutze ihn als Hauptgrundlage.\n\
                 Wenn die Antwort nicht im Kontext steht (und du es nicht wissen kannst), sage ehrlich, dass du es nicht weißt.\n\
                 Erfinde keine Fakten. Wenn Details nicht im Kontext oder Tool-Ergebnis stehen, sage klar, dass du dazu keine Informationen hast.\n\
                 Mische keine Sprachen. Wenn Kontext auf Englisch ist, nutze ihn, aber antworte trotzdem komplett auf Deutsch.\n\
                 Du darfst Tools nutzen, um die interne Datenbank abzufragen/zu aktualisieren, wenn nötig.\n\
                 Wenn du Tool-Ergebnisse nutzt, erkläre sie verständlich auf Deutsch.\n",
                self.bot_name
            ),
        };

        if correct_name {
            system.push_str(&match lang {
                Language::En => format!(
                    "Start this reply with exactly: \"I’m {}.\" Then continue normally. (Only this time.)\n",
                    self.bot_name
                ),
                Language::De => format!(
                    "Beginne diese Antwort mit genau: \"Ich bin {}.\" Dann normal weitermachen. (Nur dieses Mal.)\n",
                    self.bot_name
                ),
            });
        }
        system
    }
}
