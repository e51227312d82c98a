//! Question bank builder: templated technical and behavioral questions for a profile.
//!
//! Pure content assembly: no ranking, no randomness. The same profile always
//! yields the same bank.

use crate::models::profile::Profile;
use crate::models::question::{Question, QuestionBank};

const SECOND_SKILL_FALLBACK: &str = "frameworks related to your field";

pub fn build(profile: &Profile) -> QuestionBank {
    QuestionBank {
        technical: technical_questions(profile),
        behavioral: behavioral_questions(),
    }
}

fn question(id: u32, prompt: String, ideal_answer: String, tip: &str) -> Question {
    Question {
        id,
        prompt,
        ideal_answer,
        tip: tip.to_string(),
    }
}

fn technical_questions(profile: &Profile) -> Vec<Question> {
    let title = &profile.job_title;
    let primary = profile.skill(0).unwrap_or("your core skills");
    let secondary = profile.skill(1).unwrap_or(SECOND_SKILL_FALLBACK);

    vec![
        question(
            1,
            format!("Can you explain how you've used {primary} in your previous projects?"),
            format!(
                "When discussing my experience with {primary}, I emphasize specific projects where I \
                 applied this skill to solve real problems. For example, in my most recent role, I used \
                 {primary} to develop a solution that improved process efficiency by 30%. I focus on \
                 explaining my technical approach, the challenges I faced, and the measurable outcomes achieved."
            ),
            "Be specific about your technical contributions and quantify the impact of your work whenever \
             possible. Use the STAR method (Situation, Task, Action, Result) to structure your response.",
        ),
        question(
            2,
            format!("What's your approach to learning new technologies like {secondary}?"),
            "My approach to learning new technologies involves a combination of structured learning and \
             practical application. I typically start with documentation and tutorials to understand the \
             fundamentals, then reinforce my learning by building small projects. I also participate in \
             online communities and collaborate with peers to gain different perspectives and solve \
             problems collaboratively."
                .to_string(),
            "Emphasize your self-motivation and systematic approach to acquiring new skills. Provide \
             examples of technologies you've recently learned and how you applied them in real situations.",
        ),
        question(
            3,
            format!("Describe a challenging technical problem you've solved in your previous roles as a {title}."),
            "When faced with challenging technical problems, I follow a systematic troubleshooting approach. \
             In a recent project, we encountered [specific problem]. I first gathered all available \
             information, broke down the issue into smaller components, and prioritized the most critical \
             aspects. After identifying the root cause through [specific methods], I implemented [specific \
             solution] which resulted in [specific outcome]."
                .to_string(),
            "Choose an example that showcases your technical depth and problem-solving methodology. Explain \
             your thought process and decision-making rationale clearly.",
        ),
        question(
            4,
            format!("How do you ensure code quality and best practices in your {title} role?"),
            "I ensure code quality through a multi-faceted approach that includes following established \
             coding standards, implementing automated testing with high coverage, conducting regular code \
             reviews, and using static analysis tools. I believe in the importance of documenting code for \
             future maintainability and practicing continuous refactoring to improve design patterns and \
             eliminate technical debt."
                .to_string(),
            "Mention specific tools or methodologies you've used for quality assurance. Discuss how you \
             balance quality with delivery timelines and how you address technical debt.",
        ),
        question(
            5,
            format!("What metrics do you use to evaluate the success of your work as a {title}?"),
            format!(
                "As a {title}, I evaluate success using both technical and business metrics. Technical \
                 metrics include code quality measurements like test coverage, bug rates, and system \
                 performance indicators. Business metrics focus on user adoption, customer satisfaction, and \
                 how my technical solutions impact key business KPIs. I believe the most successful technical \
                 work directly contributes to business objectives while maintaining high technical standards."
            ),
            "Connect technical achievements to business outcomes. Show that you understand the bigger \
             picture and how your role contributes to organizational goals.",
        ),
    ]
}

fn behavioral_questions() -> Vec<Question> {
    vec![
        question(
            1,
            "Tell me about a time when you had to work under a tight deadline. How did you manage it?"
                .to_string(),
            "When faced with tight deadlines, I prioritize work strategically and maintain clear \
             communication. For example, in my previous role, we had an unexpected client request that \
             needed to be completed within half the normal timeframe. I immediately assessed what was \
             needed, broke down the work into manageable components, and collaborated with team members to \
             distribute tasks based on individual strengths. I set up daily quick check-ins to monitor \
             progress and address blockers. Through effective prioritization and team coordination, we \
             delivered the project on time without compromising quality."
                .to_string(),
            "Emphasize your time management skills, ability to prioritize, and communication strategy. \
             Provide a specific example with a clear beginning, middle, and successful conclusion.",
        ),
        question(
            2,
            "How do you handle conflicts within a team?".to_string(),
            "I approach conflicts with a focus on open communication and finding common ground. In one \
             instance, there was disagreement in my team about the technical approach for a project. I \
             organized a meeting where each person could express their perspective without interruption. \
             Then, I guided the discussion toward identifying the strengths in each approach and the \
             underlying concerns. By focusing on our shared goals and evaluating options objectively against \
             project requirements, we developed a hybrid solution that incorporated the best elements from \
             different perspectives and ultimately led to a successful project outcome."
                .to_string(),
            "Show that you view conflict as an opportunity for growth and better solutions. Demonstrate \
             active listening skills and an ability to find win-win resolutions.",
        ),
        question(
            3,
            "Describe a situation where you had to adapt to a significant change at work.".to_string(),
            "Adaptability is essential in today's fast-paced work environment. When our company underwent a \
             major reorganization last year, my role and reporting structure changed significantly. I \
             embraced this change by first taking time to understand the new objectives and expectations. I \
             scheduled meetings with new stakeholders to build relationships and gain clarity on priorities. \
             I also identified skills gaps for my new responsibilities and created a personal development \
             plan to address them. By maintaining a positive attitude and focusing on the opportunities \
             rather than the challenges, I was able to transition smoothly and contribute effectively in the \
             new structure within two months."
                .to_string(),
            "Show resilience and a positive attitude toward change. Highlight your proactive approach to \
             understanding and navigating new situations.",
        ),
        question(
            4,
            "What's your approach to managing multiple competing priorities?".to_string(),
            "Managing competing priorities requires systematic organization and regular reassessment. I \
             maintain a prioritization system based on urgency, importance, and strategic value. Each \
             morning, I review and adjust my priorities based on any new developments. I communicate \
             proactively with stakeholders about timelines and potential constraints. When truly overloaded, \
             I work with my manager to realign expectations or resources. This approach helped me \
             successfully juggle three major projects simultaneously in my last role, all of which were \
             delivered on time and met their objectives."
                .to_string(),
            "Demonstrate your organizational skills and ability to make difficult decisions about what takes \
             precedence. Mention tools or systems you use to stay organized.",
        ),
        question(
            5,
            "Where do you see yourself professionally in five years?".to_string(),
            "In five years, I aim to have deepened my expertise in [specific area related to job] while \
             developing broader leadership capabilities. I'm particularly interested in growing toward \
             [specific relevant role or responsibility] where I can combine technical excellence with \
             strategic thinking. I'm committed to continuous learning, and over the next few years, I plan \
             to develop skills in [relevant emerging area] which I believe will be increasingly important in \
             this industry. Ultimately, I want to be in a position where I can make significant \
             contributions to challenging projects while helping to mentor and develop others in the team."
                .to_string(),
            "Show ambition that's aligned with the potential career path at the company. Balance technical \
             growth with leadership development, and demonstrate that you've given thoughtful consideration \
             to your career trajectory.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(skills: &[&str]) -> Profile {
        Profile {
            job_title: "Data Scientist".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: String::new(),
            education: String::new(),
        }
    }

    #[test]
    fn test_bank_has_five_of_each_with_sequential_ids() {
        let bank = build(&profile(&["Python", "SQL"]));
        assert_eq!(bank.technical.len(), 5);
        assert_eq!(bank.behavioral.len(), 5);
        let ids: Vec<u32> = bank.technical.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let ids: Vec<u32> = bank.behavioral.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_technical_prompts_interpolate_profile() {
        let bank = build(&profile(&["Python", "SQL"]));
        assert!(bank.technical[0].prompt.contains("Python"));
        assert!(bank.technical[1].prompt.contains("SQL"));
        assert!(bank.technical[2].prompt.contains("Data Scientist"));
        assert!(bank.technical[4].ideal_answer.starts_with("As a Data Scientist"));
    }

    #[test]
    fn test_single_skill_uses_generic_second_topic() {
        let bank = build(&profile(&["Figma"]));
        assert!(bank.technical[1].prompt.contains(SECOND_SKILL_FALLBACK));
    }

    #[test]
    fn test_build_is_deterministic() {
        let p = profile(&["Java"]);
        assert_eq!(build(&p), build(&p));
    }

    #[test]
    fn test_flattened_order_is_technical_then_behavioral() {
        let bank = build(&profile(&["Java"]));
        let flat: Vec<_> = bank.flattened().collect();
        assert_eq!(flat.len(), bank.question_count());
        assert_eq!(flat[0].1, &bank.technical[0]);
        assert_eq!(flat[5].1, &bank.behavioral[0]);
    }
}
