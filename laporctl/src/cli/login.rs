use clap::Args;

use common::Role;

use super::{Command, CommandError, Context};

#[derive(Args, Debug)]
#[command(about = "Log in as a PPPK officer or administrator")]
pub struct LoginCommand {
    #[arg(long, default_value = "user", help = "Role (user or admin)")]
    role: Role,
    #[arg(long, help = "Registered staff name")]
    name: String,
    #[arg(long, help = "Secret; prompted without echo when omitted")]
    secret: Option<String>,
}

impl Command for LoginCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        let secret = match &self.secret {
            Some(secret) => secret.clone(),
            None => {
                let prompt = match self.role {
                    Role::User => "No. IC (tanpa -): ",
                    Role::Admin => "Kata laluan: ",
                };
                rpassword::prompt_password(prompt)?
            }
        };

        let session = ctx.sessions.login(self.role, &self.name, &secret)?;
        println!(
            "Logged in as {} ({})",
            session.identity().unwrap_or("?"),
            session.role
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
#[command(about = "Clear the stored session")]
pub struct LogoutCommand {}

impl Command for LogoutCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        ctx.sessions.logout()?;
        println!("Logged out");
        Ok(())
    }
}

#[derive(Args, Debug)]
#[command(about = "Show the stored session")]
pub struct WhoamiCommand {}

impl Command for WhoamiCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        match ctx.sessions.current() {
            Some(session) => println!(
                "{} ({})",
                session.identity().unwrap_or("?"),
                session.role
            ),
            None => println!("Not logged in"),
        }
        Ok(())
    }
}
