use anyhow::Result;
use scholarcal_core::assistant::{AssistantOption, Conversation};

pub fn run(option: Option<&str>, list: bool) -> Result<()> {
    if list {
        for option in AssistantOption::GUIDED {
            println!("{:<22} {}", option.id(), option.label());
        }
        return Ok(());
    }

    let mut conversation = Conversation::new();
    conversation.open();

    if let Some(id) = option {
        let option: AssistantOption = id.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        conversation.choose(option);
    }

    // Only the latest reply; the greeting is skipped once a topic is answered
    if let Some(reply) = conversation.messages().last() {
        println!("{}", reply.content);
    }

    Ok(())
}
