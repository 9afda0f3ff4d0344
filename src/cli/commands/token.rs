use clap::Subcommand;
use serde_json::json;

use crate::auth::{decode_jwt, generate_jwt, Claims};
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::session::{Session, SessionUser};
use crate::tier::{Role, Tier};

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed session token (uses SECURITY_JWT_SECRET)")]
    Issue {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "FREE")]
        tier: Tier,
        #[arg(long, default_value = "USER")]
        role: Role,
        #[arg(long, help = "Mark the user as an affiliate")]
        affiliate: bool,
        #[arg(long, help = "Override the configured expiry")]
        expiry_hours: Option<i64>,
    },

    #[command(about = "Verify a session token and print its session")]
    Decode {
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id, email, name, tier, role, affiliate, expiry_hours } => {
            let user = SessionUser {
                id: user_id,
                email,
                name,
                tier,
                role,
                is_affiliate: affiliate,
            };
            let claims = match expiry_hours {
                Some(hours) => Claims::with_expiry_hours(&user, hours)?,
                None => Claims::new(&user)?,
            };
            let token = generate_jwt(&claims)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "token": token, "expiresAt": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Decode { token } => {
            let session = Session::from(decode_jwt(&token)?);
            match output_format {
                OutputFormat::Json => output_json(&session),
                OutputFormat::Text => {
                    let u = &session.user;
                    println!("User:      {} <{}>", u.id, u.email);
                    println!("Tier:      {}", u.tier);
                    println!("Role:      {}", u.role);
                    println!("Affiliate: {}", u.is_affiliate);
                    println!("Expires:   {}", session.expires.to_rfc3339());
                    Ok(())
                }
            }
        }
    }
}
