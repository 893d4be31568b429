//! Keyword-matched FAQ chatbot.
//!
//! A static lookup table, explicitly not natural-language handling.

const FAQ: [(&str, &str); 8] = [
    (
        "appointment",
        "You can book appointments through the \"Appointments\" tab in your dashboard. \
         Click \"+ Book Appointment\", fill in the doctor name, select department, \
         choose date and time, and provide reason for visit.",
    ),
    (
        "hours",
        "Our clinic operates Monday to Friday 9:00 AM to 6:00 PM, and Saturday 10:00 AM \
         to 4:00 PM. Closed on Sundays and public holidays. Emergency services available 24/7.",
    ),
    (
        "records",
        "Access your medical records from the \"Reports\" section. All data is securely \
         encrypted. You can download reports as CSV files.",
    ),
    (
        "bmi",
        "Use the BMI Calculator tab to track your weight. Enter height and weight to get \
         your BMI score and health recommendations.",
    ),
    (
        "emergency",
        "Call 911 or visit nearest emergency room immediately. Our emergency team is \
         available 24/7.",
    ),
    (
        "prescription",
        "Contact your doctor for prescription refills. Refills take 24-48 hours. Your \
         pharmacist will notify you when ready.",
    ),
    (
        "privacy",
        "Your data is protected with advanced encryption. We follow HIPAA compliance. \
         Your information is never shared without consent.",
    ),
    (
        "reschedule",
        "Reschedule from the Appointments tab by selecting your appointment and choosing \
         a new date/time. Or cancel and book a new one.",
    ),
];

const THANKS: &str = "You're welcome! Is there anything else I can help you with? Feel free \
                      to ask me any questions about our healthcare services.";

const GREETING: &str = "Hello! Welcome to our healthcare support. I'm here to help you with \
                        appointments, health information, and general inquiries. How can I \
                        assist you today?";

const HELP: &str = "I'm happy to help! You can ask me about: booking appointments, clinic \
                    hours, medical records, BMI calculation, emergency services, prescription \
                    refills, privacy & security, or appointment rescheduling. What would you \
                    like to know?";

const FALLBACK: &str = "Thank you for your question! I'm here to assist you with healthcare \
                        services. You can ask me about appointments, medical records, clinic \
                        hours, emergency services, or any other health-related questions. For \
                        specific concerns, please contact our helpline at +1-800-HEALTH-1.";

/// Returns the canned reply for a message, matching FAQ keywords first.
pub fn reply(message: &str) -> String {
    let message = message.to_lowercase();

    for (keyword, response) in FAQ {
        if message.contains(keyword) {
            return response.to_owned();
        }
    }

    if ["thanks", "thank", "ty"].iter().any(|w| message.contains(w)) {
        return THANKS.to_owned();
    }
    if ["hello", "hi", "hey"].iter().any(|w| message.contains(w)) {
        return GREETING.to_owned();
    }
    if ["help", "support", "assist"]
        .iter()
        .any(|w| message.contains(w))
    {
        return HELP.to_owned();
    }

    FALLBACK.to_owned()
}
