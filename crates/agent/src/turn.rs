//! The conversation turn controller.
//!
//! Owns the live transcript, the archived history, and the collaborator
//! handles, and drives one full turn per submission: guard, branch on
//! intent, gather context, assemble the prompt, generate, and surface the
//! outcome. A turn can degrade (advisories, missing context) but never
//! leaves the controller stuck: the state always returns to [`TurnState::Idle`].

use std::sync::Arc;

use chatweave_config::AppConfig;
use chatweave_core::{
    Conversation, Generator, ImageAnalyzer, ImageSurface, Message, Thread, TurnError,
};
use chatweave_web::{SearchTransport, WebContext, WebContextBuilder, find_first_url};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::prompt::{PromptAssembler, PromptInput};
use crate::rules::{image_subject, wants_generated_image};

const SEARCHING_STATUS: &str = "Searching the web for information...";
const NO_USABLE_RESULTS: &str =
    "The web search found no usable results. I will answer from my base knowledge.";
const GENERATION_FAILED: &str =
    "Something went wrong while generating the reply. Please try again.";
const IMAGE_SURFACE_ACK: &str =
    "Opening the image canvas to create your picture. You can adjust style and details there.";
const IMAGE_READY_CAPTION: &str = "Image created!";

const TITLE_WINDOW: usize = 10;
const TITLE_CHAR_CAP: usize = 60;

/// Whether the controller is mid-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingGeneration,
}

/// What a submission turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A normal turn: the transcript now ends with an assistant reply
    /// (or a failure advisory).
    Replied,
    /// An image-generation request was handed to the surface; poll
    /// [`TurnController::poll_generated_image`] for the result.
    ImageRequested { concept: String },
    /// An image was requested but the surface is unavailable.
    ImageUnavailable,
}

/// Drives conversation turns against the platform collaborators.
pub struct TurnController {
    config: AppConfig,
    conversation: Conversation,
    history: Vec<Thread>,
    state: TurnState,
    generator: Arc<dyn Generator>,
    analyzer: Arc<dyn ImageAnalyzer>,
    surface: Arc<dyn ImageSurface>,
    transport: Arc<dyn SearchTransport>,
    builder: WebContextBuilder,
    pending_image: Option<oneshot::Receiver<Vec<u8>>>,
}

impl TurnController {
    pub fn new(
        config: AppConfig,
        generator: Arc<dyn Generator>,
        analyzer: Arc<dyn ImageAnalyzer>,
        surface: Arc<dyn ImageSurface>,
        transport: Arc<dyn SearchTransport>,
    ) -> Self {
        let builder = WebContextBuilder::new(Arc::clone(&transport));
        Self {
            config,
            conversation: Conversation::new(),
            history: Vec::new(),
            state: TurnState::Idle,
            generator,
            analyzer,
            surface,
            transport,
            builder,
            pending_image: None,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn history(&self) -> &[Thread] {
        &self.history
    }

    /// Run one conversation turn.
    ///
    /// Rejects empty submissions and submissions while a turn is already
    /// in flight; in both cases the transcript is untouched. Everything
    /// past the guards is soft: retrieval and generation failures become
    /// transcript messages, never errors.
    pub async fn submit(
        &mut self,
        text: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return Err(TurnError::EmptySubmission);
        }
        if self.state == TurnState::AwaitingGeneration || self.generator.is_busy() {
            return Err(TurnError::Busy);
        }

        // Image-generation branch: never touches the generator
        if attachment.is_none() && wants_generated_image(text) {
            return Ok(self.request_image(text).await);
        }

        let has_attachment = attachment.is_some();
        match &attachment {
            Some(image) => self
                .conversation
                .push(Message::user_image(image.clone(), text)),
            None => self.conversation.push(Message::user(text)),
        }

        self.state = TurnState::AwaitingGeneration;
        self.run_reply_turn(text, has_attachment, attachment).await;
        self.state = TurnState::Idle;
        Ok(TurnOutcome::Replied)
    }

    async fn request_image(&mut self, text: &str) -> TurnOutcome {
        let concept = image_subject(text);
        info!(concept = %concept, "Image generation requested");
        self.conversation.push(Message::user(text));
        match self.surface.request(&concept).await {
            Ok(receiver) => {
                self.conversation.push(Message::assistant(IMAGE_SURFACE_ACK));
                self.pending_image = Some(receiver);
                TurnOutcome::ImageRequested { concept }
            }
            Err(error) => {
                warn!(%error, "Image surface rejected the request");
                self.conversation.push(Message::assistant(error.to_string()));
                TurnOutcome::ImageUnavailable
            }
        }
    }

    async fn run_reply_turn(
        &mut self,
        text: &str,
        has_attachment: bool,
        attachment: Option<Vec<u8>>,
    ) {
        let web_context = if text.is_empty() {
            None
        } else {
            self.gather_web_context(text).await
        };

        let analysis = match &attachment {
            Some(image) => {
                let analysis = self.analyzer.analyze(image).await;
                if analysis.trim().is_empty() {
                    None
                } else {
                    // Surface the analysis in the transcript as well
                    self.conversation.push(Message::assistant(analysis.clone()));
                    Some(analysis)
                }
            }
            None => None,
        };

        let prompt = PromptAssembler::assemble(&PromptInput {
            conversation: &self.conversation,
            user_text: text,
            analysis: analysis.as_deref(),
            web_context: web_context.as_deref(),
            has_attachment,
        });
        debug!(chars = prompt.chars().count(), "Prompt assembled");

        match self
            .generator
            .respond(&prompt, self.config.generation.reply_temperature)
            .await
        {
            Ok(reply) => self.conversation.push(Message::assistant(reply)),
            Err(error) => {
                warn!(%error, "Generator failed");
                self.conversation.push(Message::assistant(GENERATION_FAILED));
            }
        }
    }

    /// Gather web context for a query, surfacing progress and advisories
    /// in the transcript.
    ///
    /// An explicit URL in the text bypasses search entirely; otherwise the
    /// full probe/search/fetch pipeline runs when web access is enabled.
    async fn gather_web_context(&mut self, text: &str) -> Option<String> {
        if let Some(url) = find_first_url(text) {
            debug!(url = %url, "Explicit URL, skipping search");
            let preview = self.transport.page_text(&url).await?;
            return Some(format!("Web content from {url}:\n\n{preview}"));
        }
        if !self.config.allow_web_access {
            return None;
        }

        self.conversation.push(Message::assistant(SEARCHING_STATUS));
        let outcome = self.builder.build(text).await;
        self.conversation.retract_last_if(SEARCHING_STATUS);

        match outcome {
            Some(WebContext::Block { text, source_count }) => {
                let noun = if source_count == 1 { "source" } else { "sources" };
                self.conversation.push(Message::assistant(format!(
                    "Found {source_count} {noun} on the web. Analyzing the content..."
                )));
                Some(text)
            }
            Some(WebContext::Advisory(message)) => {
                self.conversation.push(Message::assistant(message));
                None
            }
            None => {
                self.conversation
                    .push(Message::assistant(NO_USABLE_RESULTS));
                None
            }
        }
    }

    /// Check for a completed image generation.
    ///
    /// Appends an assistant image message and returns `true` when bytes
    /// have arrived; a dropped sender clears the pending slot silently.
    pub fn poll_generated_image(&mut self) -> bool {
        let Some(receiver) = &mut self.pending_image else {
            return false;
        };
        match receiver.try_recv() {
            Ok(image) => {
                self.pending_image = None;
                self.conversation
                    .push(Message::assistant_image(image, IMAGE_READY_CAPTION));
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                debug!("Image generation abandoned");
                self.pending_image = None;
                false
            }
        }
    }

    /// Archive the current transcript as a titled thread and start fresh.
    ///
    /// An empty transcript only resets the generator session. The new
    /// thread is prepended so history stays newest-first.
    pub async fn archive_and_reset(&mut self) {
        if self.conversation.is_empty() {
            self.reset_session().await;
            return;
        }

        let title = self.generate_title().await;
        let messages = std::mem::take(&mut self.conversation.messages);
        let thread = Thread::new(title, messages);
        info!(thread_id = %thread.id, title = %thread.title, "Archived conversation");
        self.history.insert(0, thread);
        self.reset_session().await;
    }

    async fn reset_session(&mut self) {
        self.conversation.clear();
        self.pending_image = None;
        if let Err(error) = self.generator.reset().await {
            warn!(%error, "Session reset failed");
        }
    }

    /// Copy an archived thread back as the current transcript. History is
    /// untouched. Returns whether the thread was found.
    pub fn load_thread(&mut self, id: &str) -> bool {
        match self.history.iter().find(|t| t.id == id) {
            Some(thread) => {
                self.conversation.messages = thread.messages.clone();
                true
            }
            None => false,
        }
    }

    /// Remove an archived thread. Returns whether anything was removed.
    pub fn delete_thread(&mut self, id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|t| t.id != id);
        self.history.len() < before
    }

    async fn generate_title(&self) -> String {
        if self.generator.is_busy() {
            return self.fallback_title();
        }

        let recent = self.conversation.recent(TITLE_WINDOW);
        let lines: Vec<String> = recent
            .iter()
            .map(|m| {
                let role = if m.is_user() { "User" } else { "Assistant" };
                if m.text.trim().is_empty() {
                    format!("[{role}] (no text)")
                } else {
                    format!("[{role}] {}", m.text)
                }
            })
            .collect();
        let prompt = format!(
            "Generate a concise title (at most 6 words) for this conversation. \
Avoid quotes, trailing punctuation, and special characters. Output the title only.\n\n\
Conversation:\n{}",
            lines.join("\n")
        );

        match self
            .generator
            .respond(&prompt, self.config.generation.title_temperature)
            .await
        {
            Ok(response) => {
                let candidate = response.trim();
                let candidate = candidate.lines().next().unwrap_or("").trim();
                if candidate.is_empty() {
                    self.fallback_title()
                } else {
                    candidate.chars().take(TITLE_CHAR_CAP).collect()
                }
            }
            Err(error) => {
                debug!(%error, "Title generation failed, using fallback");
                self.fallback_title()
            }
        }
    }

    fn fallback_title(&self) -> String {
        if let Some(first) = self
            .conversation
            .messages
            .iter()
            .find(|m| !m.text.trim().is_empty())
        {
            first.text.trim().chars().take(TITLE_CHAR_CAP).collect()
        } else {
            format!("New chat ({})", chrono::Utc::now().format("%Y-%m-%d %H:%M"))
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: TurnState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatweave_core::{GeneratorError, SurfaceError};
    use chatweave_web::SearchPage;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use url::Url;

    struct MockGenerator {
        replies: Mutex<Vec<String>>,
        calls: Mutex<Vec<(String, f32)>>,
        busy: AtomicBool,
        fail: AtomicBool,
        resets: AtomicUsize,
    }

    impl MockGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
                busy: AtomicBool::new(false),
                fail: AtomicBool::new(false),
                resets: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> Vec<(String, f32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn respond(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            if self.fail.load(Ordering::SeqCst) {
                return Err(GeneratorError::Failed("boom".to_string()));
            }
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "ok".to_string()))
        }

        fn is_busy(&self) -> bool {
            self.busy.load(Ordering::SeqCst)
        }

        async fn reset(&self) -> Result<(), GeneratorError> {
            self.resets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockAnalyzer(String);

    #[async_trait]
    impl ImageAnalyzer for MockAnalyzer {
        async fn analyze(&self, _image: &[u8]) -> String {
            self.0.clone()
        }
    }

    struct MockSurface {
        available: bool,
        sender: Mutex<Option<oneshot::Sender<Vec<u8>>>>,
    }

    impl MockSurface {
        fn new(available: bool) -> Self {
            Self {
                available,
                sender: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ImageSurface for MockSurface {
        async fn request(&self, _concept: &str) -> Result<oneshot::Receiver<Vec<u8>>, SurfaceError> {
            if !self.available {
                return Err(SurfaceError::Unavailable);
            }
            let (tx, rx) = oneshot::channel();
            *self.sender.lock().unwrap() = Some(tx);
            Ok(rx)
        }
    }

    struct ScriptedTransport {
        reachable: bool,
        page: SearchPage,
        bodies: HashMap<String, String>,
        searched: AtomicBool,
    }

    impl ScriptedTransport {
        fn new(page: SearchPage) -> Self {
            Self {
                reachable: true,
                page,
                bodies: HashMap::new(),
                searched: AtomicBool::new(false),
            }
        }

        fn offline() -> Self {
            let mut t = Self::new(SearchPage::Unreachable);
            t.reachable = false;
            t
        }

        fn with_body(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl SearchTransport for ScriptedTransport {
        async fn probe(&self) -> bool {
            self.reachable
        }

        async fn search_page(&self, _query: &str) -> SearchPage {
            self.searched.store(true, Ordering::SeqCst);
            self.page.clone()
        }

        async fn page_text(&self, url: &Url) -> Option<String> {
            self.bodies.get(url.as_str()).cloned()
        }
    }

    struct Fixture {
        generator: Arc<MockGenerator>,
        transport: Arc<ScriptedTransport>,
        controller: TurnController,
    }

    fn fixture_with(
        config: AppConfig,
        generator: MockGenerator,
        analyzer: MockAnalyzer,
        surface: MockSurface,
        transport: ScriptedTransport,
    ) -> Fixture {
        let generator = Arc::new(generator);
        let transport = Arc::new(transport);
        let controller = TurnController::new(
            config,
            Arc::clone(&generator) as Arc<dyn Generator>,
            Arc::new(analyzer),
            Arc::new(surface),
            Arc::clone(&transport) as Arc<dyn SearchTransport>,
        );
        Fixture {
            generator,
            transport,
            controller,
        }
    }

    fn fixture(transport: ScriptedTransport) -> Fixture {
        fixture_with(
            AppConfig::default(),
            MockGenerator::new(&[]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            transport,
        )
    }

    fn offline_fixture() -> Fixture {
        fixture(ScriptedTransport::offline())
    }

    fn texts(controller: &TurnController) -> Vec<String> {
        controller
            .conversation()
            .messages
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    fn results_html(entries: &[(&str, &str)]) -> String {
        entries
            .iter()
            .map(|(url, title)| format!(r#"<a class="result__a" href="{url}">{title}</a>"#))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn empty_submission_is_rejected() {
        let mut f = offline_fixture();
        let err = f.controller.submit("   ", None).await.unwrap_err();
        assert!(matches!(err, TurnError::EmptySubmission));
        assert!(f.controller.conversation().is_empty());
    }

    #[tokio::test]
    async fn busy_submit_is_a_noop() {
        let mut f = offline_fixture();
        f.generator.busy.store(true, Ordering::SeqCst);
        let err = f.controller.submit("hello", None).await.unwrap_err();
        assert!(matches!(err, TurnError::Busy));
        assert!(f.controller.conversation().is_empty());

        f.generator.busy.store(false, Ordering::SeqCst);
        f.controller.force_state(TurnState::AwaitingGeneration);
        let err = f.controller.submit("hello", None).await.unwrap_err();
        assert!(matches!(err, TurnError::Busy));
        assert!(f.controller.conversation().is_empty());
    }

    #[tokio::test]
    async fn image_request_never_calls_the_generator() {
        let mut f = offline_fixture();
        let outcome = f
            .controller
            .submit("create an image of a dragon", None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::ImageRequested {
                concept: "a dragon".to_string()
            }
        );
        assert_eq!(f.controller.state(), TurnState::Idle);
        assert!(f.generator.calls().is_empty());

        let messages = texts(&f.controller);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "create an image of a dragon");
        assert_eq!(messages[1], IMAGE_SURFACE_ACK);
    }

    #[tokio::test]
    async fn poll_appends_image_when_bytes_arrive() {
        let surface = Arc::new(MockSurface::new(true));
        let generator = Arc::new(MockGenerator::new(&[]));
        let transport = Arc::new(ScriptedTransport::offline());
        let mut controller = TurnController::new(
            AppConfig::default(),
            Arc::clone(&generator) as Arc<dyn Generator>,
            Arc::new(MockAnalyzer(String::new())),
            Arc::clone(&surface) as Arc<dyn ImageSurface>,
            Arc::clone(&transport) as Arc<dyn SearchTransport>,
        );

        controller.submit("draw a tall ship", None).await.unwrap();
        assert!(!controller.poll_generated_image());

        let sender = surface.sender.lock().unwrap().take().unwrap();
        sender.send(vec![9, 9, 9]).unwrap();
        assert!(controller.poll_generated_image());

        let last = controller.conversation().messages.last().unwrap();
        assert!(last.has_image());
        assert_eq!(last.text, IMAGE_READY_CAPTION);
        assert!(!controller.poll_generated_image());
    }

    #[tokio::test]
    async fn unavailable_surface_yields_advisory() {
        let mut f = fixture_with(
            AppConfig::default(),
            MockGenerator::new(&[]),
            MockAnalyzer(String::new()),
            MockSurface::new(false),
            ScriptedTransport::offline(),
        );
        let outcome = f
            .controller
            .submit("generate a picture of a cat", None)
            .await
            .unwrap();
        assert_eq!(outcome, TurnOutcome::ImageUnavailable);
        let messages = texts(&f.controller);
        assert!(messages[1].contains("not available"));
    }

    #[tokio::test]
    async fn howto_query_gets_one_deep_source() {
        let html = results_html(&[("https://recipes.example/pizza", "Perfect Pizza")]);
        let transport = ScriptedTransport::new(SearchPage::Html(html))
            .with_body("https://recipes.example/pizza", &"d".repeat(9000));
        let mut f = fixture_with(
            AppConfig::default(),
            MockGenerator::new(&["Here is how."]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            transport,
        );

        f.controller
            .submit("how to make pizza at home", None)
            .await
            .unwrap();

        let messages = texts(&f.controller);
        // user, found-1-source annotation, reply; the searching status is retracted
        assert_eq!(messages.len(), 3);
        assert!(!messages.iter().any(|m| m == SEARCHING_STATUS));
        assert!(messages[1].contains("Found 1 source"));
        assert_eq!(messages[2], "Here is how.");

        let calls = f.generator.calls();
        assert_eq!(calls.len(), 1);
        let (prompt, temperature) = &calls[0];
        assert_eq!(*temperature, 0.7);
        assert!(prompt.contains("SOURCE 1: Perfect Pizza"));
        assert!(prompt.contains("\n\n━━━\nUSER: how to make pizza at home"));
        // Tutorial budget caps the source body at 8000 chars
        assert!(prompt.contains(&"d".repeat(8000)));
        assert!(!prompt.contains(&"d".repeat(8001)));
    }

    #[tokio::test]
    async fn explicit_url_bypasses_search() {
        let transport = ScriptedTransport::new(SearchPage::Html(String::new()))
            .with_body("https://example.com/article", "article body text");
        let mut f = fixture(transport);

        f.controller
            .submit("summarize https://example.com/article for me", None)
            .await
            .unwrap();

        assert!(!f.transport.searched.load(Ordering::SeqCst));
        let calls = f.generator.calls();
        assert!(calls[0]
            .0
            .contains("Web content from https://example.com/article:\n\narticle body text"));
        // No search annotations in the transcript: just user and reply
        assert_eq!(f.controller.conversation().len(), 2);
    }

    #[tokio::test]
    async fn offline_search_yields_advisory_and_base_answer() {
        let mut f = offline_fixture();
        f.controller
            .submit("what happened in the news", None)
            .await
            .unwrap();

        let messages = texts(&f.controller);
        assert_eq!(messages.len(), 3);
        assert!(messages[1].contains("Cannot reach the network"));
        // The reply still happens, without web context
        let (prompt, _) = &f.generator.calls()[0];
        assert!(!prompt.contains("━━━"));
        assert_eq!(f.controller.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn web_access_disabled_skips_the_pipeline() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&[]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );
        f.controller.submit("latest news", None).await.unwrap();
        assert_eq!(f.controller.conversation().len(), 2);
        assert!(!f.transport.searched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn attachment_analysis_is_surfaced_and_folded() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&["A poodle."]),
            MockAnalyzer("A small dog with curly fur.".to_string()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );

        f.controller
            .submit("what breed is this?", Some(vec![1, 2, 3]))
            .await
            .unwrap();

        let messages = texts(&f.controller);
        // user image, visible analysis, reply
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], "A small dog with curly fur.");
        assert_eq!(messages[2], "A poodle.");

        let (prompt, _) = &f.generator.calls()[0];
        assert!(prompt.contains(crate::prompt::ANALYSIS_INSTRUCTION));
        assert!(prompt.contains("User: what breed is this?"));
    }

    #[tokio::test]
    async fn bare_attachment_asks_for_description() {
        let mut f = offline_fixture();
        f.controller.submit("", Some(vec![7, 7])).await.unwrap();
        let (prompt, _) = &f.generator.calls()[0];
        assert!(prompt.contains(crate::prompt::ASK_FOR_DESCRIPTION));
    }

    #[tokio::test]
    async fn generator_failure_degrades_to_advisory() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&[]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );
        f.generator.fail.store(true, Ordering::SeqCst);

        let outcome = f.controller.submit("hello there", None).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Replied);
        assert_eq!(f.controller.state(), TurnState::Idle);
        let messages = texts(&f.controller);
        assert_eq!(messages.last().unwrap(), GENERATION_FAILED);
    }

    #[tokio::test]
    async fn archive_produces_titled_thread_and_clears() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&["Sure.", "Pizza Dough Basics\nextra line"]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );

        f.controller
            .submit("tell me about pizza dough", None)
            .await
            .unwrap();
        f.controller.archive_and_reset().await;

        assert!(f.controller.conversation().is_empty());
        assert_eq!(f.controller.history().len(), 1);
        let thread = &f.controller.history()[0];
        assert_eq!(thread.title, "Pizza Dough Basics");
        assert!(!thread.title.contains('\n'));
        assert!(thread.title.chars().count() <= 60);
        assert_eq!(thread.messages.len(), 2);

        // Title call runs at the title temperature, replies at 0.7
        let calls = f.generator.calls();
        assert_eq!(calls[0].1, 0.7);
        assert_eq!(calls[1].1, 0.3);
        assert_eq!(f.generator.resets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn archive_of_empty_transcript_only_resets() {
        let mut f = offline_fixture();
        f.controller.archive_and_reset().await;
        assert!(f.controller.history().is_empty());
        assert_eq!(f.generator.resets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn title_falls_back_to_first_message_prefix() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&["reply"]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );
        let long_question = "q".repeat(100);
        f.controller.submit(&long_question, None).await.unwrap();

        f.generator.fail.store(true, Ordering::SeqCst);
        f.controller.archive_and_reset().await;

        let thread = &f.controller.history()[0];
        assert_eq!(thread.title, "q".repeat(60));
    }

    #[tokio::test]
    async fn load_and_delete_threads() {
        let mut config = AppConfig::default();
        config.allow_web_access = false;
        let mut f = fixture_with(
            config,
            MockGenerator::new(&["reply", "Title"]),
            MockAnalyzer(String::new()),
            MockSurface::new(true),
            ScriptedTransport::offline(),
        );
        f.controller.submit("remember this", None).await.unwrap();
        f.controller.archive_and_reset().await;
        let id = f.controller.history()[0].id.clone();

        assert!(f.controller.load_thread(&id));
        assert_eq!(f.controller.conversation().len(), 2);
        assert_eq!(f.controller.history().len(), 1);

        assert!(!f.controller.load_thread("missing"));
        assert!(f.controller.delete_thread(&id));
        assert!(f.controller.history().is_empty());
        assert!(!f.controller.delete_thread(&id));
    }
}
