use crate::agents::AgentRegistry;
use crate::config::Config;
use crate::error::Result;

pub fn execute(config: &Config) -> Result<()> {
    let registry = AgentRegistry::from_definitions(&config.agents)?;
    let source = if config.agents.is_empty() {
        "built-in"
    } else {
        "configured"
    };

    println!("Agents ({}):", source);
    for agent in registry.iter() {
        println!("  {:<20} {}", agent.id, agent.display_name);
        println!("  {:<20} directory: {}", "", agent.directory_prefix());
        println!(
            "  {:<20} entrypoint: {}:{}",
            "",
            agent.entrypoint_module(),
            agent.entrypoint_object
        );
        if !agent.description.is_empty() {
            println!("  {:<20} {}", "", agent.description);
        }
    }

    Ok(())
}
