//! Built-in health insurance reference documents and sample questions.

/// Reference documents matched by `careline match`.
pub const DOCUMENTS: [&str; 8] = [
    "Health insurance helps cover the cost of medical services, including doctor visits, hospital stays, and prescription medications.",
    "Most health insurance plans have a deductible, which is the amount you pay before your insurance starts to cover costs.",
    "A copayment is a fixed fee you pay for a covered service, usually due at the time of service.",
    "Preventive services like annual checkups and vaccines are typically covered without a copay.",
    "HMO plans require members to choose a primary care provider and get referrals to see specialists.",
    "PPO plans offer more flexibility in choosing doctors and do not require referrals for specialists.",
    "Pre-existing conditions are typically covered under ACA-compliant plans.",
    "Open enrollment is the period during which you can sign up for or change your health insurance plan.",
];

/// Questions used when no `--query` is given.
pub const QUERIES: [&str; 15] = [
    "What is health insurance and why is it important?",
    "How does a health insurance plan help pay for medical expenses?",
    "What is a deductible in health insurance?",
    "How are copayments different from deductibles?",
    "Do I have to pay anything for preventive care services?",
    "What's the difference between HMO and PPO health plans?",
    "Do PPO plans require referrals to see specialists?",
    "Can I choose my own doctor with an HMO?",
    "Are pre-existing conditions covered by all health insurance plans?",
    "What does preventive care typically include?",
    "What is the open enrollment period?",
    "Can I apply for health insurance outside of open enrollment?",
    "If I visit a specialist without a referral, will my insurance still pay?",
    "How do I know if a specific treatment is covered by my plan?",
    "What happens if I don't meet my deductible in a year?",
];
