// src/llm/prompts.rs

pub const CONNECTION_TEST_PROMPT: &str = "Reply with \"OK\".";

pub fn interview_extraction_prompt(text: &str) -> String {
    format!(
        r#"You extract interview details from messages. Read the text below and pull out the interview information.

## Fields
1. company_name: the company (e.g. ByteDance, Tencent, Stripe)
2. round_name: the interview round (e.g. AI screen, HR round, Tech 1, Tech 2, Final)
3. start_time: start time in ISO 8601 (e.g. 2024-02-08T14:00:00)
4. end_time: end time in ISO 8601
5. meeting_link: meeting link (Zoom, Google Meet, Teams, Feishu, ...)

## Output format
Output JSON only, nothing else:
{{
  "company_name": "ByteDance",
  "round_name": "Tech 1",
  "start_time": "2024-02-08T14:00:00",
  "end_time": "2024-02-08T15:00:00",
  "meeting_link": "https://...",
  "confidence": 0.9
}}

Use null for any field you cannot find. confidence is your overall confidence (0-1).
If no end time is given, infer one from the start time (interviews usually last 30-60 minutes).

## Text
{}"#,
        text
    )
}

pub fn job_description_prompt(jd: &str, company: &str, job_title: &str, salary: &str) -> String {
    let salary = if salary.trim().is_empty() {
        "not provided"
    } else {
        salary.trim()
    };
    let job_title = if job_title.trim().is_empty() {
        "not provided"
    } else {
        job_title.trim()
    };

    format!(
        r#"You are a career advisor helping a candidate prepare for an application.

COMPANY: {}
POSITION: {}
SALARY: {}

JOB DESCRIPTION:
{}

TASK: Analyze this job description and answer in Markdown with these sections:

1. **Role Summary** - What the job actually is, in two or three sentences
2. **Key Requirements** - Must-have skills and experience
3. **Nice to Have** - Bonus qualifications
4. **Tech Stack** - Technologies and tools mentioned or implied
5. **Salary Assessment** - Whether the salary looks reasonable for the role, if one was given
6. **Interview Focus** - Topics most likely to come up, with preparation tips
7. **Questions to Ask** - 3 sharp questions for the interviewer

Keep the analysis concise, actionable, and professional."#,
        company, job_title, salary, jd
    )
}
