//! Rendering for the password-reset OTP email.

pub const OTP_SUBJECT: &str = "Password Reset OTP for HostelConnect";

/// Render the OTP email body. `first_name` has already been resolved by the
/// caller (falling back to "User" when no profile matched).
pub fn render_otp_email(first_name: &str, otp: &str) -> String {
    format!(
        r#"
      <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e0e0e0; border-radius: 10px;">
        <h2 style="color: #324054; text-align: center;">Password Reset</h2>
        <p>Hello {first_name},</p>
        <p>We received a request to reset your password for your HostelConnect account. Please use the following One-Time Password (OTP) to complete the password reset process:</p>
        <div style="background-color: #f5f5f5; padding: 15px; text-align: center; border-radius: 5px; margin: 20px 0;">
          <h1 style="margin: 0; color: #324054; letter-spacing: 5px;">{otp}</h1>
        </div>
        <p>This OTP will expire in 15 minutes.</p>
        <p>If you did not request a password reset, please ignore this email or contact support immediately.</p>
        <p style="margin-top: 30px; font-size: 14px; color: #777;">Regards,<br>The HostelConnect Team</p>
      </div>
    "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_greeting_and_otp() {
        let html = render_otp_email("Asha", "482913");
        assert!(html.contains("Hello Asha,"));
        assert!(html.contains("482913"));
        assert!(html.contains("expire in 15 minutes"));
    }

    #[test]
    fn fallback_name_reads_naturally() {
        let html = render_otp_email("User", "000000");
        assert!(html.contains("Hello User,"));
    }
}
